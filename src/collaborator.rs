//! Shared HTTP plumbing for collaborator clients
//!
//! The directory, ledger and receiver clients all talk JSON over HTTP and
//! report failures the same way: a collaborator-supplied `message` is passed
//! through verbatim, anything else is reduced to the HTTP status line.

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

/// Error body shape shared by the mock ledger and receiver services.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Builds an HTTP client with the given per-request timeout.
///
/// # Arguments
///
/// * `timeout` - Maximum duration of a single request
///
/// # Returns
///
/// * `Ok(Client)` - Configured client
/// * `Err(anyhow::Error)` - TLS backend or builder failure
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .context("Failed to create HTTP client")
}

/// Converts a non-2xx response into the message reported to callers.
///
/// If the body is JSON with a `message` field, that message is returned as-is.
/// Otherwise the result is `"<what> responded with: <status>"`, e.g.
/// `"Error opening transfer, ledger responded with: 422 Unprocessable Entity"`.
///
/// # Arguments
///
/// * `what` - Prefix naming the failed operation and collaborator
/// * `response` - The unsuccessful response (consumed)
pub async fn failure_message(what: &str, response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => format!("{} responded with: {}", what, status),
    }
}
