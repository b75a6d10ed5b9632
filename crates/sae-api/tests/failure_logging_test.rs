#![allow(clippy::unwrap_used)]
// Every failed request is logged exactly once at ERROR level.
//
// Kept in its own test binary so the scoped subscriber below is the only
// dispatcher tracing sees.

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use url::Url;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

use sae_api::{
    ApplianceClient, ApplianceInfo, ConfigChange, Control, Error, Meter, Schedule, Settings,
};

/// Counts ERROR events emitted by this crate.
#[derive(Clone, Default)]
struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::ERROR && meta.target().starts_with("sae_api") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

async fn expect_one_error<T: Debug>(
    counter: &ErrorCounter,
    label: &str,
    call: impl Future<Output = Result<T, Error>>,
) -> Error {
    let before = counter.count();
    let err = call.await.unwrap_err();
    assert_eq!(counter.count() - before, 1, "{label}: expected one error log");
    err
}

fn appliance() -> ApplianceInfo {
    serde_json::from_value(serde_json::json!({
        "id": "F-1",
        "vendor": "Miele",
        "name": "Dishwasher",
        "type": "DishWasher",
        "serial": "D-1",
        "maxPowerConsumption": 2000
    }))
    .unwrap()
}

async fn exercise_all(counter: &ErrorCounter, client: &ApplianceClient) {
    let info = appliance();
    let control = Control::MockSwitch;
    let meter = Meter::None;
    let schedules: Vec<Schedule> = Vec::new();
    let settings = Settings::default();

    expect_one_error(counter, "list", client.list_appliance_headers()).await;
    expect_one_error(counter, "get appliance", client.get_appliance_info("F-1")).await;
    expect_one_error(counter, "save appliance", client.save_appliance_info(&info, true)).await;
    expect_one_error(counter, "delete appliance", client.delete_appliance("F-1")).await;

    expect_one_error(counter, "control defaults", client.get_control_defaults()).await;
    expect_one_error(counter, "get control", client.get_control("F-1")).await;
    expect_one_error(
        counter,
        "save control",
        client.save_or_delete_control("F-1", ConfigChange::Save(&control)),
    )
    .await;
    expect_one_error(
        counter,
        "delete control",
        client.save_or_delete_control("F-1", ConfigChange::Delete),
    )
    .await;

    expect_one_error(counter, "meter defaults", client.get_meter_defaults()).await;
    expect_one_error(counter, "get meter", client.get_meter("F-1")).await;
    expect_one_error(counter, "update meter", client.update_meter("F-1", &meter)).await;

    expect_one_error(counter, "get schedules", client.get_schedules("F-1")).await;
    expect_one_error(counter, "save schedules", client.save_schedules("F-1", &schedules)).await;

    expect_one_error(counter, "settings defaults", client.get_settings_defaults()).await;
    expect_one_error(counter, "get settings", client.get_settings()).await;
    expect_one_error(counter, "save settings", client.save_settings(&settings)).await;
}

#[tokio::test]
async fn test_each_failure_logged_once() {
    let counter = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    // Server errors
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;
    let base_url = Url::parse(&format!("{}/sae", server.uri())).unwrap();
    let client = ApplianceClient::with_client(reqwest::Client::new(), base_url);
    exercise_all(&counter, &client).await;

    // Undecodable body
    server.reset().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;
    let err = expect_one_error(&counter, "decode", client.get_settings()).await;
    assert!(matches!(err, Error::Deserialization { .. }), "got: {err:?}");

    // Encode failure: the empty record cannot be written as a body
    let err = expect_one_error(
        &counter,
        "encode",
        client.save_or_delete_control("F-1", ConfigChange::Save(&Control::None)),
    )
    .await;
    assert!(matches!(err, Error::Serialization(_)), "got: {err:?}");

    // Connection refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let base_url = Url::parse(&format!("http://127.0.0.1:{port}/sae")).unwrap();
    let client = ApplianceClient::with_client(reqwest::Client::new(), base_url);
    exercise_all(&counter, &client).await;

    // 16 calls per pass, two passes, plus decode and encode
    assert_eq!(counter.count(), 34);
}
