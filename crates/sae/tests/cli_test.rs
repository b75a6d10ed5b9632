//! Integration tests for the `sae` CLI binary.
//!
//! Argument parsing, help, completions and config handling run without a
//! server; the end-to-end tests point the binary at a wiremock SAE.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `sae` binary with env isolation.
///
/// Clears all `SAE_*` env vars and points config directories at `home`
/// so tests never touch the user's real configuration.
fn sae_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sae");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("SAE_PROFILE")
        .env_remove("SAE_HOST")
        .env_remove("SAE_PORT")
        .env_remove("SAE_SCHEME")
        .env_remove("SAE_OUTPUT")
        .env_remove("SAE_INSECURE")
        .env_remove("SAE_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// `sae` pointed at the mock server's host and port.
fn sae_against(home: &Path, server: &MockServer) -> assert_cmd::Command {
    let addr = server.address();
    let mut cmd = sae_cmd(home);
    cmd.args([
        "--host",
        &addr.ip().to_string(),
        "--port",
        &addr.port().to_string(),
    ]);
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = sae_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    sae_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("Smart Appliance Enabler")
            .and(predicate::str::contains("appliances"))
            .and(predicate::str::contains("control"))
            .and(predicate::str::contains("meter"))
            .and(predicate::str::contains("schedules"))
            .and(predicate::str::contains("settings")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    sae_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sae"));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    sae_cmd(home.path())
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    sae_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sae"));
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    sae_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_missing_host_is_reported() {
    let home = tempfile::tempdir().unwrap();
    let output = sae_cmd(home.path())
        .args(["appliances", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("No SAE host configured"), "got:\n{text}");
}

#[test]
fn test_unknown_profile_is_reported() {
    let home = tempfile::tempdir().unwrap();
    let output = sae_cmd(home.path())
        .args(["--profile", "attic", "settings", "get"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("Profile 'attic' not found"), "got:\n{text}");
}

#[test]
fn test_config_path_is_under_config_home() {
    let home = tempfile::tempdir().unwrap();
    sae_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_profiles() {
    let home = tempfile::tempdir().unwrap();

    sae_cmd(home.path())
        .args(["config", "set", "host", "raspi.local"])
        .assert()
        .success();
    sae_cmd(home.path())
        .args(["--profile", "garage", "config", "set", "host", "10.0.0.9"])
        .assert()
        .success();

    sae_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *").and(predicate::str::contains("garage")));

    sae_cmd(home.path())
        .args(["config", "use", "garage"])
        .assert()
        .success();
    sae_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("default_profile = \"garage\"")
                .and(predicate::str::contains("host = \"raspi.local\"")),
        );
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    sae_cmd(home.path())
        .args(["config", "set", "color", "red"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

// ── Against a mock SAE ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_appliances_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sae/appliances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "F-2", "name": "Dryer", "type": "Dryer", "controllable": true },
            { "id": "F-1", "name": "Washer", "type": "WashingMachine" }
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = sae_against(home.path(), &server)
        .args(["-o", "json-compact", "appliances", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listed[0]["id"], "F-2");
    assert_eq!(listed[1]["id"], "F-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_appliances_list_plain_and_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sae/appliances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "F-1", "name": "Washer", "vendor": "Miele", "type": "WashingMachine" }
        ])))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    sae_against(home.path(), &server)
        .args(["-o", "plain", "appliances", "list"])
        .assert()
        .success()
        .stdout("F-1\n");

    sae_against(home.path(), &server)
        .args(["appliances", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Miele").and(predicate::str::contains("Controllable")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_appliance_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sae/appliance"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let output = sae_against(home.path(), &server)
        .args(["appliances", "get", "F-404"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("appliance 'F-404' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_control_renders_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sae/control"))
        .and(query_param("id", "F-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    sae_against(home.path(), &server)
        .args(["-o", "json", "control", "get", "F-1"])
        .assert()
        .success()
        .stdout("null\n");

    sae_against(home.path(), &server)
        .args(["control", "get", "F-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No control configured for F-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_meter_set_from_file() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/sae/meter"))
        .and(query_param("id", "F-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("meter.json");
    let meter = json!({
        "@class": "de.avanux.smartapplianceenabler.meter.S0ElectricityMeter",
        "gpio": 22,
        "impulsesPerKwh": 1000
    });
    std::fs::write(&file, meter.to_string()).unwrap();

    sae_against(home.path(), &server)
        .args(["meter", "set", "F-1", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("Meter of F-1 set to S0ElectricityMeter"));

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent, meter);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_control_delete_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/sae/control"))
        .and(query_param("id", "F-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    sae_against(home.path(), &server)
        .args(["--yes", "control", "delete", "F-1"])
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_evs_lists_vehicles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sae/control"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@class": "de.avanux.smartapplianceenabler.control.ev.ElectricVehicleCharger",
            "vehicles": [
                { "id": 1, "name": "Leaf", "defaultSocManual": 80 },
                { "id": 2, "name": "Zoe" }
            ]
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    sae_against(home.path(), &server)
        .args(["-o", "plain", "evs", "F-9"])
        .assert()
        .success()
        .stdout("1\n2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unmodelled_control_is_shown_not_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sae/control"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "@class": "de.avanux.smartapplianceenabler.control.StartingCurrentSwitch",
            "powerThreshold": 20
        })))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    sae_against(home.path(), &server)
        .args(["-o", "json-compact", "control", "get", "F-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"powerThreshold\":20"));

    let output = sae_against(home.path(), &server)
        .args(["evs", "F-1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("StartingCurrentSwitch"));
}

#[test]
fn test_connection_refused_exit_code() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let home = tempfile::tempdir().unwrap();
    sae_cmd(home.path())
        .args(["--host", "127.0.0.1", "--port", &port.to_string()])
        .args(["settings", "get"])
        .assert()
        .code(7);
}
