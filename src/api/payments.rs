//! Payment execution endpoint
//!
//! `PUT /payments/:id` validates the request shape and hands the payment to the
//! executor. Validation here is what the executor relies on: every string field
//! it needs is present and non-empty.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Reply};

use crate::executor::{receiver_name, PaymentExecutor, PaymentRequest};

/// Error identifier for malformed payment requests.
pub const INVALID_BODY_ERROR: &str = "InvalidBodyError";

/// Payment request body as sent by the payer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    pub receiver: Option<String>,
    pub source_account: Option<String>,
    pub source_amount: Option<String>,
    pub destination_amount: Option<String>,
    pub memo: Option<String>,
    pub source_identifier: Option<String>,
    pub condition: Option<String>,
}

/// Error payload for failed payment requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error kind
    pub id: String,
    /// Human-readable message
    pub message: String,
}

impl PaymentBody {
    /// Checks required fields and converts the body into an executor request.
    ///
    /// # Returns
    ///
    /// * `Ok(PaymentRequest)` - All required fields present and non-empty
    /// * `Err(String)` - Message naming the first missing field
    pub fn into_request(self, payment_id: String) -> Result<PaymentRequest, String> {
        fn required(field: &str, value: Option<String>) -> Result<String, String> {
            match value {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(format!("Missing required field: {}", field)),
            }
        }

        if payment_id.trim().is_empty() {
            return Err("Missing required field: paymentId".to_string());
        }

        let receiver_uri = required("receiver", self.receiver)?;
        if receiver_name(&receiver_uri).is_empty() {
            return Err(format!("Invalid receiver: {} has no receiver name", receiver_uri));
        }

        Ok(PaymentRequest {
            payment_id,
            receiver_uri,
            source_account: required("sourceAccount", self.source_account)?,
            source_amount: required("sourceAmount", self.source_amount)?,
            destination_amount: required("destinationAmount", self.destination_amount)?,
            memo: self.memo,
            source_identifier: self.source_identifier,
            condition: self.condition.filter(|c| !c.is_empty()),
        })
    }
}

fn error_reply(status: StatusCode, id: &str, message: String) -> warp::reply::Response {
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            id: id.to_string(),
            message,
        }),
        status,
    )
    .into_response()
}

/// Handler for `PUT /payments/:id`.
///
/// # Returns
///
/// * 200 with the payment result
/// * 400 with `InvalidBodyError` for unreadable or incomplete bodies
/// * 502 with the executor's error kind when a step failed
pub async fn execute_payment_handler(
    payment_id: String,
    body: Bytes,
    executor: Arc<PaymentExecutor>,
) -> Result<warp::reply::Response, warp::Rejection> {
    debug!("PUT /payments/{} - Received body: {}", payment_id, String::from_utf8_lossy(&body));

    let parsed = match serde_json::from_slice::<PaymentBody>(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Payment {} body deserialization failed: {}", payment_id, e);
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                INVALID_BODY_ERROR,
                format!("Invalid JSON: {}", e),
            ));
        }
    };

    let request = match parsed.into_request(payment_id) {
        Ok(request) => request,
        Err(message) => {
            return Ok(error_reply(StatusCode::BAD_REQUEST, INVALID_BODY_ERROR, message));
        }
    };

    match executor.execute(request).await {
        Ok(result) => Ok(warp::reply::json(&result).into_response()),
        Err(e) => Ok(error_reply(StatusCode::BAD_GATEWAY, e.kind(), e.to_string())),
    }
}

/// Creates a warp filter that injects the payment executor.
pub fn with_executor(
    executor: Arc<PaymentExecutor>,
) -> impl Filter<Extract = (Arc<PaymentExecutor>,), Error = Infallible> + Clone {
    warp::any().map(move || executor.clone())
}
