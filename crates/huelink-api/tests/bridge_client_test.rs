// Integration tests for the bridge client using wiremock.
//
// The mock server plays the bridge; cloud discovery is pointed at it via
// the configurable endpoint.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huelink_api::{
    AppIdentity, BridgeAddress, BridgeClient, BridgeLocator, ClientConfig, CredentialManager,
    Error, Transport,
};

const CREDENTIAL: &str = "testuser";

// ── Helpers ─────────────────────────────────────────────────────────

fn transport() -> Transport {
    Transport::new().expect("transport should build")
}

/// Probe the mock server as if it were a user-supplied bridge address.
async fn bridge_address(server: &MockServer) -> BridgeAddress {
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;

    let transport = transport();
    BridgeLocator::new(&transport)
        .probe(&server.address().to_string())
        .await
        .expect("probe should succeed")
}

/// Mount the two bootstrap endpoints: credential validation and light
/// enumeration (two lights, "1" and "2").
async fn mount_bootstrap(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{CREDENTIAL}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"config": {"name": "test bridge"}})),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{CREDENTIAL}/lights/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "1": {"name": "Desk", "state": {"on": true, "bri": 120, "sat": 40, "hue": 9000}},
            "2": {"name": "Hallway", "state": {"on": false, "bri": 0, "sat": 0, "hue": 0}},
        })))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        address: Some(server.address().to_string()),
        credential: Some(CREDENTIAL.into()),
        ..ClientConfig::default()
    }
}

async fn connected(server: &MockServer) -> BridgeClient {
    mount_bootstrap(server).await;
    BridgeClient::connect(config_for(server))
        .await
        .expect("bootstrap should succeed")
}

// ── Discovery ───────────────────────────────────────────────────────

#[tokio::test]
async fn discovery_returns_first_bridge_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/nupnp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"internalipaddress": "10.0.0.5"},
            {"internalipaddress": "10.0.0.9"},
        ])))
        .mount(&server)
        .await;

    let transport = transport();
    let locator = BridgeLocator::with_endpoint(&transport, format!("{}/api/nupnp", server.uri()));
    let address = locator.discover().await.unwrap();

    assert_eq!(address.as_str(), "10.0.0.5");
}

#[tokio::test]
async fn discovery_fails_on_empty_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/nupnp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let transport = transport();
    let locator = BridgeLocator::with_endpoint(&transport, format!("{}/api/nupnp", server.uri()));
    let result = locator.discover().await;

    assert!(
        matches!(result, Err(Error::Discovery { .. })),
        "expected Discovery, got: {result:?}"
    );
}

#[tokio::test]
async fn discovery_fails_on_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/nupnp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": "shape"})))
        .mount(&server)
        .await;

    let transport = transport();
    let locator = BridgeLocator::with_endpoint(&transport, format!("{}/api/nupnp", server.uri()));

    assert!(matches!(
        locator.discover().await,
        Err(Error::Discovery { .. })
    ));
}

// ── Address probe ───────────────────────────────────────────────────

#[tokio::test]
async fn probe_returns_supplied_address_unchanged() {
    let server = MockServer::start().await;
    let supplied = server.address().to_string();

    let address = bridge_address(&server).await;

    assert_eq!(address.as_str(), supplied);
}

#[tokio::test]
async fn probe_fails_on_connection_refused() {
    // Grab a port that was live and no longer is.
    let server = MockServer::start().await;
    let dead_address = server.address().to_string();
    drop(server);

    let transport = transport();
    let result = BridgeLocator::new(&transport).probe(&dead_address).await;

    assert!(
        matches!(result, Err(Error::InvalidAddress { .. })),
        "expected InvalidAddress, got: {result:?}"
    );
}

#[tokio::test]
async fn probe_fails_on_malformed_address() {
    let transport = transport();
    let result = BridgeLocator::new(&transport).probe("not a host").await;

    assert!(matches!(result, Err(Error::InvalidAddress { .. })));
}

// ── Credential validation ───────────────────────────────────────────

#[tokio::test]
async fn validate_accepts_credential_with_config_key() {
    let server = MockServer::start().await;
    let address = bridge_address(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"config": {}})))
        .mount(&server)
        .await;

    let transport = transport();
    let credential = CredentialManager::new(&transport)
        .validate(&address, "abc123")
        .await
        .unwrap();

    assert_eq!(credential.as_str(), "abc123");
}

#[tokio::test]
async fn validate_rejects_error_body() {
    let server = MockServer::start().await;
    let address = bridge_address(&server).await;

    // Unauthorized credentials still get HTTP 200, with an error array.
    Mock::given(method("GET"))
        .and(path("/api/nope"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"error": {"type": 1, "description": "unauthorized user"}}
        ])))
        .mount(&server)
        .await;

    let transport = transport();
    let result = CredentialManager::new(&transport)
        .validate(&address, "nope")
        .await;

    assert!(matches!(result, Err(Error::InvalidCredential { .. })));
}

#[tokio::test]
async fn validate_rejects_object_without_config_key() {
    let server = MockServer::start().await;
    let address = bridge_address(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/partial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"lights": {}})))
        .mount(&server)
        .await;

    let transport = transport();
    let result = CredentialManager::new(&transport)
        .validate(&address, "partial")
        .await;

    assert!(matches!(result, Err(Error::InvalidCredential { .. })));
}

// ── Pairing handshake ───────────────────────────────────────────────

#[tokio::test]
async fn pair_extracts_minted_credential() {
    let server = MockServer::start().await;
    let address = bridge_address(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(body_json(json!({"devicetype": "my-app#kitchen-pi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"success": {"username": "abc123"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport();
    let identity = AppIdentity::new("my-app", "kitchen-pi");
    let credential = CredentialManager::new(&transport)
        .pair(&address, &identity, None)
        .await
        .unwrap();

    assert_eq!(credential.as_str(), "abc123");
}

#[tokio::test]
async fn pair_fails_when_button_not_pressed() {
    let server = MockServer::start().await;
    let address = bridge_address(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"error": {"type": 101, "description": "link button not pressed"}}
        ])))
        .mount(&server)
        .await;

    let transport = transport();
    let result = CredentialManager::new(&transport)
        .pair(&address, &AppIdentity::default(), None)
        .await;

    match result {
        Err(ref err @ Error::Handshake { .. }) => assert!(err.requires_link_button()),
        other => panic!("expected Handshake, got: {other:?}"),
    }
}

// ── Bootstrap & enumeration ─────────────────────────────────────────

#[tokio::test]
async fn bootstrap_enumerates_light_ids() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    let ids: Vec<&str> = client.light_ids().collect();
    assert_eq!(ids, ["1", "2"]);
}

#[tokio::test]
async fn bootstrap_aborts_on_rejected_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{CREDENTIAL}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"error": {"type": 1, "description": "unauthorized user"}}
        ])))
        .mount(&server)
        .await;

    let result = BridgeClient::connect(config_for(&server)).await;

    assert!(
        matches!(result, Err(Error::InvalidCredential { .. })),
        "expected InvalidCredential, got: {result:?}"
    );
}

#[tokio::test]
async fn bootstrap_aborts_on_non_object_light_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{CREDENTIAL}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"config": {}})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{CREDENTIAL}/lights/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["1", "2"])))
        .mount(&server)
        .await;

    let result = BridgeClient::connect(config_for(&server)).await;

    assert!(matches!(result, Err(Error::Registry { .. })));
}

#[tokio::test]
async fn pairing_bootstrap_uses_minted_credential() {
    let server = MockServer::start().await;

    // Address probe, handshake, then bootstrap under the new credential.
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"success": {"username": "minted-user"}}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/minted-user/lights/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"7": {}})))
        .mount(&server)
        .await;

    let config = ClientConfig {
        address: Some(server.address().to_string()),
        credential: None,
        ..ClientConfig::default()
    };
    let client = BridgeClient::connect(config).await.unwrap();

    assert_eq!(client.session().credential().as_str(), "minted-user");
    assert_eq!(client.light_ids().collect::<Vec<_>>(), ["7"]);
}

// ── Light reads ─────────────────────────────────────────────────────

#[tokio::test]
async fn state_decodes_light_fields() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{CREDENTIAL}/lights/1/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Desk",
            "state": {"on": true, "bri": 200, "sat": 254, "hue": 46920, "reachable": true},
        })))
        .mount(&server)
        .await;

    let state = client.state("1").await.unwrap();

    assert!(state.on);
    assert_eq!(state.bri, 200);
    assert_eq!(state.sat, 254);
    assert_eq!(state.hue, 46920);
}

#[tokio::test]
async fn state_fails_on_non_ok_response() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{CREDENTIAL}/lights/2/")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.state("2").await;

    match result {
        Err(Error::UnexpectedStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

// ── Light writes ────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_negates_current_on_state() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("/api/{CREDENTIAL}/lights/1/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Desk",
            "state": {"on": true, "bri": 120, "sat": 40, "hue": 9000},
        })))
        .mount(&server)
        .await;

    // The light is on, so toggle must write exactly {"on": false}.
    Mock::given(method("PUT"))
        .and(path(format!("/api/{CREDENTIAL}/lights/1/state")))
        .and(body_json(json!({"on": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"success": {"/lights/1/state/on": false}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = client.toggle("1").await.unwrap();
    assert!(envelope.ok);
}

#[tokio::test]
async fn set_brightness_sends_single_field_payload() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("PUT"))
        .and(path(format!("/api/{CREDENTIAL}/lights/2/state")))
        .and(body_json(json!({"bri": 254})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"success": {"/lights/2/state/bri": 254}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = client.set_brightness("2", 254).await.unwrap();

    assert!(envelope.ok);
    assert_eq!(envelope.status, 200);
    assert!(envelope.body.is_some());
}

#[tokio::test]
async fn non_ok_write_surfaces_as_envelope_not_error() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    Mock::given(method("PUT"))
        .and(path(format!("/api/{CREDENTIAL}/lights/1/state")))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let envelope = client.set_hue("1", 40000).await.unwrap();

    assert!(!envelope.ok);
    assert_eq!(envelope.status, 503);
    assert!(envelope.body.is_none());
}

#[tokio::test]
async fn operations_reject_unknown_light_ids() {
    let server = MockServer::start().await;
    let client = connected(&server).await;

    let result = client.turn_on("99").await;

    assert!(
        matches!(result, Err(Error::UnknownLight { ref id }) if id == "99"),
        "expected UnknownLight, got: {result:?}"
    );
}

// ── Friendly names ──────────────────────────────────────────────────

#[tokio::test]
async fn friendly_names_resolve_to_enumerated_ids() {
    let server = MockServer::start().await;
    let mut client = connected(&server).await;

    client.name_light("desk", "1").unwrap();

    assert_eq!(client.light_by_name("desk"), Some("1"));
    assert!(matches!(
        client.name_light("ghost", "42"),
        Err(Error::UnknownLight { .. })
    ));
}
