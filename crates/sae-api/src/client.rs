// SAE REST client
//
// Wraps `reqwest::Client` with SAE URL construction and JSON mapping.
// Each public method issues exactly one request. Nothing is sent until the
// returned future is polled, and dropping it abandons the request.
//
// Failures from every stage (URL, transport, status, decode, encode) go
// through `report`, which logs the failure once before handing it back.

use std::future::Future;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, trace};
use url::Url;

use crate::endpoint::ApiEndpoint;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{
    ApplianceHeader, ApplianceInfo, ConfigChange, Control, ControlDefaults, Meter, MeterDefaults,
    Schedule, Settings, SettingsDefaults,
};

const JSON: &str = "application/json";

/// Everything needed to construct an [`ApplianceClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub endpoint: ApiEndpoint,
    pub transport: TransportConfig,
}

/// Async client for the SAE appliance API.
///
/// Holds no mutable state; share it by reference across tasks.
pub struct ApplianceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApplianceClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let base_url = config.endpoint.base_url()?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client`.
    ///
    /// `base_url` is used as given apart from gaining a trailing `/`, so
    /// resource paths join underneath it.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    // ── Request pipeline ─────────────────────────────────────────────

    /// Resolve the URL, run `pipeline` against it, and report any failure.
    async fn call<T, F, Fut>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        pipeline: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(Url) -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        let url = match self.url(path, query) {
            Ok(url) => url,
            Err(e) => return Err(report(&method, path, e)),
        };
        debug!("{method} {url}");

        let target = url.to_string();
        pipeline(url).await.map_err(|e| report(&method, &target, e))
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, Error> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::Server {
                status: status.as_u16(),
                body,
            })
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        self.call(Method::GET, path, query, |url| async move {
            let body = self.send(self.http.get(url)).await?;
            decode(body)
        })
        .await
    }

    /// GET where a 0-length body means "nothing stored" rather than an error.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, Error> {
        self.call(Method::GET, path, query, |url| async move {
            let body = self.send(self.http.get(url)).await?;
            if body.is_empty() {
                trace!("empty body");
                return Ok(None);
            }
            decode(body).map(Some)
        })
        .await
    }

    async fn put<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<(), Error> {
        self.call(Method::PUT, path, query, |url| async move {
            let payload = serde_json::to_string(body)?;
            trace!("content: {payload}");
            let request = self
                .http
                .put(url)
                .header(CONTENT_TYPE, JSON)
                .body(payload);
            self.send(request).await.map(drop)
        })
        .await
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<(), Error> {
        self.call(Method::DELETE, path, query, |url| async move {
            let request = self.http.delete(url).header(CONTENT_TYPE, JSON);
            self.send(request).await.map(drop)
        })
        .await
    }

    async fn put_or_delete<B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        change: ConfigChange<&B>,
    ) -> Result<(), Error> {
        match change {
            ConfigChange::Save(body) => self.put(path, query, body).await,
            ConfigChange::Delete => self.delete(path, query).await,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Appliances ───────────────────────────────────────────────────

    /// `GET /appliances`
    pub async fn list_appliance_headers(&self) -> Result<Vec<ApplianceHeader>, Error> {
        self.get("appliances", &[]).await
    }

    /// `GET /appliance?id={id}`
    pub async fn get_appliance_info(&self, id: &str) -> Result<ApplianceInfo, Error> {
        self.get("appliance", &[("id", id)]).await
    }

    /// Create (`create = true`) or replace an appliance.
    ///
    /// `PUT /appliance?id={id}&create={create}`
    pub async fn save_appliance_info(
        &self,
        appliance: &ApplianceInfo,
        create: bool,
    ) -> Result<(), Error> {
        debug!(id = %appliance.id, create, "saving appliance");
        let create = if create { "true" } else { "false" };
        self.put(
            "appliance",
            &[("id", appliance.id.as_str()), ("create", create)],
            appliance,
        )
        .await
    }

    /// `DELETE /appliance?id={id}`
    pub async fn delete_appliance(&self, id: &str) -> Result<(), Error> {
        debug!(id, "deleting appliance");
        self.delete("appliance", &[("id", id)]).await
    }

    // ── Controls ─────────────────────────────────────────────────────

    /// `GET /controldefaults`
    pub async fn get_control_defaults(&self) -> Result<ControlDefaults, Error> {
        self.get("controldefaults", &[]).await
    }

    /// `GET /control?id={id}`
    ///
    /// Returns [`Control::None`] when nothing is stored for the appliance.
    pub async fn get_control(&self, id: &str) -> Result<Control, Error> {
        let control = self.get_optional("control", &[("id", id)]).await?;
        Ok(control.unwrap_or_default())
    }

    /// `PUT /control?id={id}` for `Save`, `DELETE /control?id={id}` for `Delete`.
    pub async fn save_or_delete_control(
        &self,
        id: &str,
        change: ConfigChange<&Control>,
    ) -> Result<(), Error> {
        debug!(id, method = %change.method(), "writing control");
        self.put_or_delete("control", &[("id", id)], change).await
    }

    /// Store `control`, or delete the stored one if `control` is empty.
    pub async fn update_control(&self, id: &str, control: &Control) -> Result<(), Error> {
        self.save_or_delete_control(id, control.into()).await
    }

    // ── Meters ───────────────────────────────────────────────────────

    /// `GET /meterdefaults`
    pub async fn get_meter_defaults(&self) -> Result<MeterDefaults, Error> {
        self.get("meterdefaults", &[]).await
    }

    /// `GET /meter?id={id}`
    ///
    /// Returns [`Meter::None`] when nothing is stored for the appliance.
    pub async fn get_meter(&self, id: &str) -> Result<Meter, Error> {
        let meter = self.get_optional("meter", &[("id", id)]).await?;
        Ok(meter.unwrap_or_default())
    }

    /// `PUT /meter?id={id}` for `Save`, `DELETE /meter?id={id}` for `Delete`.
    pub async fn save_or_delete_meter(
        &self,
        id: &str,
        change: ConfigChange<&Meter>,
    ) -> Result<(), Error> {
        debug!(id, method = %change.method(), "writing meter");
        self.put_or_delete("meter", &[("id", id)], change).await
    }

    /// Store `meter`, or delete the stored one if `meter` is empty.
    pub async fn update_meter(&self, id: &str, meter: &Meter) -> Result<(), Error> {
        self.save_or_delete_meter(id, meter.into()).await
    }

    // ── Schedules ────────────────────────────────────────────────────

    /// `GET /schedules?id={id}`
    pub async fn get_schedules(&self, id: &str) -> Result<Vec<Schedule>, Error> {
        self.get("schedules", &[("id", id)]).await
    }

    /// Replace all schedules of an appliance.
    ///
    /// `PUT /schedules?id={id}`
    pub async fn save_schedules(&self, id: &str, schedules: &[Schedule]) -> Result<(), Error> {
        debug!(id, count = schedules.len(), "saving schedules");
        self.put("schedules", &[("id", id)], schedules).await
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// `GET /settingsdefaults`
    pub async fn get_settings_defaults(&self) -> Result<SettingsDefaults, Error> {
        self.get("settingsdefaults", &[]).await
    }

    /// `GET /settings`
    pub async fn get_settings(&self) -> Result<Settings, Error> {
        self.get("settings", &[]).await
    }

    /// `PUT /settings`
    pub async fn save_settings(&self, settings: &Settings) -> Result<(), Error> {
        self.put("settings", &[], settings).await
    }
}

// ── Response handling ────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

/// The one place request failures are logged.
fn report(method: &Method, target: &str, err: Error) -> Error {
    error!(%method, url = target, error = %err, "SAE request failed");
    err
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApplianceClient {
        ApplianceClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn with_client_appends_trailing_slash() {
        let c = client("http://raspi:8080/sae");
        assert_eq!(c.base_url().as_str(), "http://raspi:8080/sae/");
    }

    #[test]
    fn query_values_are_encoded() {
        let c = client("http://raspi:8080/sae/");
        let url = c
            .url("appliance", &[("id", "F-0001 A&B"), ("create", "true")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://raspi:8080/sae/appliance?id=F-0001+A%26B&create=true"
        );
    }

    #[test]
    fn decode_error_keeps_body() {
        let err = decode::<Settings>("not json".into()).unwrap_err();
        match err {
            Error::Deserialization { message, body } => {
                assert!(message.contains("body preview"));
                assert_eq!(body, "not json");
            }
            other => panic!("expected Deserialization error, got: {other:?}"),
        }
    }

    #[test]
    fn client_from_config_uses_endpoint() {
        let config = ClientConfig {
            endpoint: ApiEndpoint::for_host("raspi"),
            transport: TransportConfig::default(),
        };
        let c = ApplianceClient::new(&config).unwrap();
        assert_eq!(c.base_url().as_str(), "http://raspi:8080/sae/");
    }
}
