//! Shared test helpers for integration tests
//!
//! The module is organized into several categories:
//! - **Constants**: Dummy payment fields
//! - **Configuration Builders**: Configs pointing collaborators at a mock server
//! - **Mock Collaborators**: wiremock mounts for lookup, ledger and receiver endpoints

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use spsp_client::config::{ApiConfig, Config, ExecutorConfig, LedgerConfig, ReceiverConfig};
use spsp_client::executor::packet::Packet;
use spsp_client::executor::PaymentRequest;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Dummy payment id
pub const DUMMY_PAYMENT_ID: &str = "c9377529-d7df-4aa1-ae37-ad5148612003";

/// Receiver short name (last segment of the receiver URI)
pub const DUMMY_RECEIVER_NAME: &str = "alice";

/// Account returned by the receiver lookup
pub const DUMMY_RECEIVER_ACCOUNT: &str = "acctAlice";

/// Account debited by the payment
pub const DUMMY_SOURCE_ACCOUNT: &str = "acctA";

pub const DUMMY_SOURCE_AMOUNT: &str = "10";
pub const DUMMY_DESTINATION_AMOUNT: &str = "10";

#[allow(dead_code)]
pub const DUMMY_SOURCE_IDENTIFIER: &str = "9809890190934023";

/// Fulfillment configured for tests
pub const DUMMY_FULFILLMENT: &str = "oAKAAA";

/// Path prefix of the mock ledger on the mock server
pub const LEDGER_PREFIX: &str = "/ledger";

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Build a valid in-memory configuration with the given collaborator URLs.
#[allow(dead_code)]
pub fn build_test_config(ledger_url: &str, receiver_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 18021,
            cors_origins: vec!["*".to_string()],
        },
        ledger: LedgerConfig {
            base_url: ledger_url.to_string(),
        },
        receiver: ReceiverConfig {
            base_url: receiver_url.to_string(),
        },
        executor: ExecutorConfig {
            step_timeout_ms: 2000,
            transfer_expiry_secs: 10,
            fulfillment: DUMMY_FULFILLMENT.to_string(),
            fail_receiver: Some("fail".to_string()),
        },
    }
}

/// Build a configuration whose ledger and receiver both live on `mock_server`.
#[allow(dead_code)]
pub fn build_test_config_with_mock_server(mock_server: &MockServer) -> Config {
    let base = mock_server.uri();
    build_test_config(&format!("{}{}", base, LEDGER_PREFIX), &base)
}

/// Payment request for `receiver` served by `mock_server`.
#[allow(dead_code)]
pub fn payment_request(mock_server: &MockServer, receiver: &str) -> PaymentRequest {
    PaymentRequest {
        payment_id: DUMMY_PAYMENT_ID.to_string(),
        receiver_uri: format!("{}/{}", mock_server.uri(), receiver),
        source_account: DUMMY_SOURCE_ACCOUNT.to_string(),
        source_amount: DUMMY_SOURCE_AMOUNT.to_string(),
        destination_amount: DUMMY_DESTINATION_AMOUNT.to_string(),
        memo: None,
        source_identifier: None,
        condition: None,
    }
}

// ============================================================================
// MOCK COLLABORATORS
// ============================================================================

/// Mount `GET /{receiver}` answering with `response`, expecting `calls` hits.
#[allow(dead_code)]
pub async fn mount_lookup(mock_server: &MockServer, receiver: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", receiver)))
        .respond_with(response)
        .expect(calls)
        .mount(mock_server)
        .await;
}

/// Mount a successful lookup for the dummy receiver.
#[allow(dead_code)]
pub fn lookup_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "account": DUMMY_RECEIVER_ACCOUNT,
        "name": "Alice",
        "currency": "USD"
    }))
}

/// Mount `PUT /ledger/transfers/{id}`.
#[allow(dead_code)]
pub async fn mount_open_transfer(mock_server: &MockServer, response: ResponseTemplate, calls: u64) {
    Mock::given(method("PUT"))
        .and(path(format!("{}/transfers/{}", LEDGER_PREFIX, DUMMY_PAYMENT_ID)))
        .respond_with(response)
        .expect(calls)
        .mount(mock_server)
        .await;
}

/// Mount `PUT /ledger/transfers/{id}/fulfillment`.
#[allow(dead_code)]
pub async fn mount_fulfillment(mock_server: &MockServer, response: ResponseTemplate, calls: u64) {
    Mock::given(method("PUT"))
        .and(path(format!("{}/transfers/{}/fulfillment", LEDGER_PREFIX, DUMMY_PAYMENT_ID)))
        .respond_with(response)
        .expect(calls)
        .mount(mock_server)
        .await;
}

/// Mount `PUT /receivers/{receiver}/payments/{id}`.
#[allow(dead_code)]
pub async fn mount_notification(mock_server: &MockServer, receiver: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("PUT"))
        .and(path(format!("/receivers/{}/payments/{}", receiver, DUMMY_PAYMENT_ID)))
        .respond_with(response)
        .expect(calls)
        .mount(mock_server)
        .await;
}

/// Decodes the base64 settlement memo attached to a credit leg.
#[allow(dead_code)]
pub fn decode_memo(memo: &str) -> Packet {
    let bytes = STANDARD.decode(memo).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// All recorded requests to `request_path`.
#[allow(dead_code)]
pub async fn requests_to(mock_server: &MockServer, request_path: &str) -> Vec<Request> {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .collect()
}

/// Poll until `request_path` has received `count` requests (or give up after 2s).
#[allow(dead_code)]
pub async fn wait_for_requests(mock_server: &MockServer, request_path: &str, count: usize) -> Vec<Request> {
    for _ in 0..40 {
        let requests = requests_to(mock_server, request_path).await;
        if requests.len() >= count {
            return requests;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    requests_to(mock_server, request_path).await
}
