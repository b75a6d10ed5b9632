// Location of the SAE REST API.
//
// The backend listens on a fixed port under a fixed context path; only the
// host (and, for reverse-proxied setups, scheme and port) vary per install.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CONTEXT_PATH: &str = "sae";

/// Scheme, host, port and context path of an SAE installation.
///
/// Renders as `<scheme>://<host>:<port>/<context_path>/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub context_path: String,
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self {
            scheme: "http".into(),
            host: "localhost".into(),
            port: DEFAULT_PORT,
            context_path: DEFAULT_CONTEXT_PATH.into(),
        }
    }
}

impl ApiEndpoint {
    /// Endpoint on `host` with the default scheme, port and context path.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    /// Build the base URL. Always ends with `/` so relative resource paths
    /// join underneath the context path.
    pub fn base_url(&self) -> Result<Url, Error> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        let path = self.context_path.trim_matches('/');
        let raw = if path.is_empty() {
            format!("{}://{host}:{}/", self.scheme, self.port)
        } else {
            format!("{}://{host}:{}/{path}/", self.scheme, self.port)
        };
        Ok(Url::parse(&raw)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_uses_port_8080_and_sae_path() {
        let url = ApiEndpoint::for_host("raspi").base_url().unwrap();
        assert_eq!(url.as_str(), "http://raspi:8080/sae/");
    }

    #[test]
    fn context_path_slashes_are_normalized() {
        let url = ApiEndpoint::for_host("raspi")
            .with_context_path("/sae/")
            .base_url()
            .unwrap();
        assert_eq!(url.path(), "/sae/");
        assert_eq!(url.join("appliances").unwrap().path(), "/sae/appliances");
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let url = ApiEndpoint::for_host("::1").base_url().unwrap();
        assert_eq!(url.as_str(), "http://[::1]:8080/sae/");
    }

    #[test]
    fn https_on_custom_port() {
        let url = ApiEndpoint::for_host("sae.example.org")
            .with_scheme("https")
            .with_port(8443)
            .base_url()
            .unwrap();
        assert_eq!(url.as_str(), "https://sae.example.org:8443/sae/");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = ApiEndpoint::for_host("").base_url().unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
