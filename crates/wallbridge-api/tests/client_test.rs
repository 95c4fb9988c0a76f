#![allow(clippy::unwrap_used)]
// Integration tests for `WallboxClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wallbridge_api::{Error, WallboxClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WallboxClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = WallboxClient::with_client(
        reqwest::Client::new(),
        base_url,
        SecretString::from("test-password"),
    );
    (server, client)
}

fn full_report() -> serde_json::Value {
    json!({
        "DeviceId": "WB-0042",
        "SoftwareVersion": "1.13",
        "HardwareRevision": 2,
        "SystemInitialized": 1,
        "NumChargingPoints": 0,
        "ErrorCode": 0,
        "Uptime": 86_400_000u64,
        "MaxCurrentTotal": 20,
        "MaxCurrentCar1": 16,
        "MaxCurrentCar2": 10,
        "MaxCurrentPerSide": 16,
        "CurrentSettingInputLead": 25,
        "CurrentCar1": 16,
        "CurrentCar2": 0,
        "PowerCar1": 3680.0,
        "PowerCar2": 0.0,
        "StatusCar1": 2,
        "StatusCar2": 0,
        "CurrentMeasSupport": 1,
        "SupportLockUnlock": 1,
        "LedSupport": 1,
        "RfidSupported": 0,
        "CommPcbTemperature": 31.5,
        "BoxTemperature": 24.0,
        "EnergyCar1": 12.4,
        "EnergyCar2": 0.0,
        "SwVersionMainPcb": 113,
        "SwVersionModbusRfidModule": 7
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn login_stores_auth_key_for_later_requests() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .and(body_json(json!({ "Password": "test-password" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "AuthKey": "key-123" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/all"))
        .and(header("AuthKey", "key-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_report()))
        .mount(&server)
        .await;

    client.login().await.unwrap();
    let report = client.status().await.unwrap();
    assert_eq!(report.device_id, "WB-0042");
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let result = client.login().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn stale_auth_key_triggers_one_relogin() {
    let (server, client) = setup().await;

    // First /all answers 403 (stale key), then succeeds after re-login.
    Mock::given(method("GET"))
        .and(path("/api/v1/all"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "AuthKey": "fresh" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/all"))
        .and(header("AuthKey", "fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_report()))
        .mount(&server)
        .await;

    let report = client.status().await.unwrap();
    assert_eq!(report.status_car1, 2);
}

#[tokio::test]
async fn persistent_403_surfaces_as_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/all"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "AuthKey": "k" })))
        .mount(&server)
        .await;

    let result = client.status().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

// ── Status parsing ──────────────────────────────────────────────────

#[tokio::test]
async fn status_report_is_decoded() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_report()))
        .mount(&server)
        .await;

    let report = client.status().await.unwrap();
    assert_eq!(report.max_current_total, 20);
    assert_eq!(report.current_setting_input_lead, 25);
    assert_eq!(report.energy_car1, Some(12.4));
    assert_eq!(report.num_charging_points, 0);
    assert_eq!(report.sw_version_modbus_rfid, 7);
}

#[tokio::test]
async fn malformed_body_is_a_protocol_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.status().await;
    match result {
        Err(Error::Protocol { ref message }) => {
            assert!(message.contains("not json"), "missing body preview: {message}");
        }
        other => panic!("expected Protocol error, got: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/all"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let result = client.status().await;
    assert!(
        matches!(result, Err(Error::Api { status: 500, .. })),
        "expected Api error, got: {result:?}"
    );
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn set_power_sends_all_three_limits() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/power"))
        .and(body_json(json!({
            "MaxCurrentTotal": 20,
            "MaxCurrentCar1": 16,
            "MaxCurrentCar2": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_power(wallbridge_api::PowerLimits {
            max_current_total: 20,
            max_current_car1: 16,
            max_current_car2: 10,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn lock_and_unlock_send_action_and_side() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/lock"))
        .and(body_json(json!({ "action": "lock", "side": 1 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.set_lock(1, true).await.unwrap();
}

#[tokio::test]
async fn led_mode_roundtrip() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/led_mode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ledMode": 2 })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/led_mode"))
        .and(body_json(json!({ "ledMode": 1 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.led_mode().await.unwrap(), 2);
    client.set_led_mode(1).await.unwrap();
}
