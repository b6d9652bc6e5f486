//! Unit tests for the payment API
//!
//! Drives the warp routes directly with collaborators served by wiremock.

use serde_json::json;
use spsp_client::api::{ApiResponse, ApiServer, ErrorBody};
use spsp_client::executor::PaymentResult;
use warp::http::StatusCode;
use warp::test::request;
use wiremock::{MockServer, ResponseTemplate};

#[path = "mod.rs"]
mod test_helpers;
use test_helpers::{
    build_test_config_with_mock_server, lookup_ok, mount_fulfillment, mount_lookup,
    mount_notification, mount_open_transfer, wait_for_requests, DUMMY_DESTINATION_AMOUNT,
    DUMMY_FULFILLMENT, DUMMY_PAYMENT_ID, DUMMY_RECEIVER_NAME, DUMMY_SOURCE_ACCOUNT,
    DUMMY_SOURCE_AMOUNT,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Create a test API server whose collaborators live on `mock_server`
fn create_test_api_server(mock_server: &MockServer) -> ApiServer {
    ApiServer::new(build_test_config_with_mock_server(mock_server)).unwrap()
}

/// Valid payment body paying `receiver`
fn valid_payment_body(mock_server: &MockServer, receiver: &str) -> serde_json::Value {
    json!({
        "receiver": format!("{}/{}", mock_server.uri(), receiver),
        "sourceAccount": DUMMY_SOURCE_ACCOUNT,
        "sourceAmount": DUMMY_SOURCE_AMOUNT,
        "destinationAmount": DUMMY_DESTINATION_AMOUNT,
        "memo": "Hi Alice!"
    })
}

// ============================================================================
// HEALTH ENDPOINT TESTS
// ============================================================================

/// What is tested: Basic health check endpoint
/// Why: Ensures service is running and responsive
#[tokio::test]
async fn test_health_endpoint() {
    let mock_server = MockServer::start().await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request().method("GET").path("/health").reply(&routes).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: ApiResponse<String> = serde_json::from_slice(response.body()).unwrap();
    assert!(body.success);
    assert_eq!(body.data.as_deref(), Some("SPSP client mock is running"));
}

/// What is tested: Unknown paths
/// Why: Routing failures get the JSON error envelope, not an empty body
#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let mock_server = MockServer::start().await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request().method("GET").path("/quotes").reply(&routes).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ApiResponse<()> = serde_json::from_slice(response.body()).unwrap();
    assert!(!body.success);
    assert_eq!(body.error.as_deref(), Some("Endpoint not found"));
}

// ============================================================================
// PAYMENT ENDPOINT TESTS
// ============================================================================

/// What is tested: Successful `PUT /payments/:id`
/// Why: The payer receives the echoed payment with fulfillment and status
#[tokio::test]
async fn test_execute_payment_success() {
    let mock_server = MockServer::start().await;
    mount_lookup(&mock_server, DUMMY_RECEIVER_NAME, lookup_ok(), 1).await;
    mount_open_transfer(&mock_server, ResponseTemplate::new(201), 1).await;
    mount_fulfillment(&mock_server, ResponseTemplate::new(200), 1).await;
    mount_notification(&mock_server, DUMMY_RECEIVER_NAME, ResponseTemplate::new(200), 1).await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request()
        .method("PUT")
        .path(&format!("/payments/{}", DUMMY_PAYMENT_ID))
        .json(&valid_payment_body(&mock_server, DUMMY_RECEIVER_NAME))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let result: PaymentResult = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(result.payment_id, DUMMY_PAYMENT_ID);
    assert_eq!(result.status, "executed");
    assert_eq!(result.fulfillment, DUMMY_FULFILLMENT);
    assert_eq!(result.memo.as_deref(), Some("Hi Alice!"));

    // Notification is detached from the response
    let notified = wait_for_requests(
        &mock_server,
        &format!("/receivers/{}/payments/{}", DUMMY_RECEIVER_NAME, DUMMY_PAYMENT_ID),
        1,
    )
    .await;
    assert_eq!(notified.len(), 1);
}

/// What is tested: Response field names
/// Why: Payers read camelCase fields
#[tokio::test]
async fn test_execute_payment_response_is_camel_case() {
    let mock_server = MockServer::start().await;
    mount_lookup(&mock_server, DUMMY_RECEIVER_NAME, lookup_ok(), 1).await;
    mount_open_transfer(&mock_server, ResponseTemplate::new(201), 1).await;
    mount_fulfillment(&mock_server, ResponseTemplate::new(200), 1).await;
    mount_notification(&mock_server, DUMMY_RECEIVER_NAME, ResponseTemplate::new(200), 1).await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request()
        .method("PUT")
        .path(&format!("/payments/{}", DUMMY_PAYMENT_ID))
        .json(&valid_payment_body(&mock_server, DUMMY_RECEIVER_NAME))
        .reply(&routes)
        .await;

    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["paymentId"], DUMMY_PAYMENT_ID);
    assert_eq!(body["sourceAccount"], DUMMY_SOURCE_ACCOUNT);
    assert_eq!(body["destinationAmount"], DUMMY_DESTINATION_AMOUNT);
    assert!(body.get("sourceIdentifier").is_none());

    wait_for_requests(
        &mock_server,
        &format!("/receivers/{}/payments/{}", DUMMY_RECEIVER_NAME, DUMMY_PAYMENT_ID),
        1,
    )
    .await;
}

/// What is tested: Injected receiver failure through the API
/// Why: Payers see the fixed lookup error and no collaborator is called
#[tokio::test]
async fn test_execute_payment_fail_receiver() {
    let mock_server = MockServer::start().await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request()
        .method("PUT")
        .path(&format!("/payments/{}", DUMMY_PAYMENT_ID))
        .json(&valid_payment_body(&mock_server, "fail"))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: ErrorBody = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.id, "ReceiverUnavailableError");
    assert_eq!(
        body.message,
        "Error getting receiver details, receiver responded with: 500 Internal Server Error"
    );
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

/// What is tested: Ledger refusing the transfer
/// Why: The ledger's message is surfaced with the failing step's kind
#[tokio::test]
async fn test_execute_payment_transfer_rejected() {
    let mock_server = MockServer::start().await;
    mount_lookup(&mock_server, DUMMY_RECEIVER_NAME, lookup_ok(), 1).await;
    mount_open_transfer(
        &mock_server,
        ResponseTemplate::new(422).set_body_json(json!({ "message": "Sender has insufficient funds." })),
        1,
    )
    .await;
    mount_fulfillment(&mock_server, ResponseTemplate::new(200), 0).await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request()
        .method("PUT")
        .path(&format!("/payments/{}", DUMMY_PAYMENT_ID))
        .json(&valid_payment_body(&mock_server, DUMMY_RECEIVER_NAME))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: ErrorBody = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.id, "TransferOpenError");
    assert_eq!(body.message, "Sender has insufficient funds.");
}

/// What is tested: Missing required field
/// Why: Incomplete requests are refused before any collaborator call
#[tokio::test]
async fn test_execute_payment_missing_field() {
    let mock_server = MockServer::start().await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request()
        .method("PUT")
        .path(&format!("/payments/{}", DUMMY_PAYMENT_ID))
        .json(&json!({
            "receiver": format!("{}/{}", mock_server.uri(), DUMMY_RECEIVER_NAME),
            "sourceAccount": DUMMY_SOURCE_ACCOUNT,
            "destinationAmount": DUMMY_DESTINATION_AMOUNT
        }))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.id, "InvalidBodyError");
    assert_eq!(body.message, "Missing required field: sourceAmount");
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

/// What is tested: Unparseable body
/// Why: Malformed JSON is a client error, not an executor failure
#[tokio::test]
async fn test_execute_payment_invalid_json() {
    let mock_server = MockServer::start().await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request()
        .method("PUT")
        .path(&format!("/payments/{}", DUMMY_PAYMENT_ID))
        .header("content-type", "application/json")
        .body("{not json")
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body.id, "InvalidBodyError");
    assert!(body.message.starts_with("Invalid JSON"));
}

/// What is tested: Wrong method on the payment path
/// Why: Payments are only executed by PUT
#[tokio::test]
async fn test_payment_path_rejects_get() {
    let mock_server = MockServer::start().await;
    let routes = create_test_api_server(&mock_server).test_routes();

    let response = request()
        .method("GET")
        .path(&format!("/payments/{}", DUMMY_PAYMENT_ID))
        .reply(&routes)
        .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
