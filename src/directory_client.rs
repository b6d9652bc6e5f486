//! Receiver Lookup Client
//!
//! Resolves a receiver URI to the ledger account that should be credited.
//! The receiver URI is dereferenced directly (`GET <receiverURI>`); the
//! receiver-side service answers with its account details.

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::collaborator::{build_http_client, failure_message};

/// Account details published by a receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverDetails {
    /// Ledger account to credit
    pub account: String,
    /// Display name of the receiver (optional)
    #[serde(default)]
    pub name: Option<String>,
    /// Currency code of the account (optional)
    #[serde(default)]
    pub currency: Option<String>,
}

/// HTTP client for receiver lookups.
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    client: Client,
}

impl DirectoryClient {
    /// Creates a lookup client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }

    /// Looks up the account behind a receiver URI.
    ///
    /// # Arguments
    ///
    /// * `receiver_uri` - Absolute URI of the receiver resource
    ///
    /// # Returns
    ///
    /// * `Ok(ReceiverDetails)` - Receiver answered with an account
    /// * `Err(anyhow::Error)` - Transport error, non-2xx status or malformed body;
    ///   the error text is the message to report to the payer
    pub async fn lookup(&self, receiver_uri: &str) -> Result<ReceiverDetails> {
        let response = self
            .client
            .get(receiver_uri)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Error getting receiver details: {}", e))?;

        if !response.status().is_success() {
            let message =
                failure_message("Error getting receiver details, receiver", response).await;
            return Err(anyhow::anyhow!(message));
        }

        response
            .json::<ReceiverDetails>()
            .await
            .map_err(|e| anyhow::anyhow!("Error getting receiver details, invalid response: {}", e))
    }
}
