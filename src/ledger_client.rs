//! Ledger REST Client
//!
//! Opens and fulfills conditional transfers on the mock ledger.
//!
//! ## Endpoints
//!
//! - `PUT {base_url}/transfers/{id}` - propose a transfer (JSON body)
//! - `PUT {base_url}/transfers/{id}/fulfillment` - submit the pre-image (plain text body)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::collaborator::{build_http_client, failure_message};

// ============================================================================
// TRANSFER STRUCTURES
// ============================================================================

/// Debit leg of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debit {
    /// Account being debited
    pub account: String,
    /// Amount as a decimal string
    pub amount: String,
}

/// Credit leg of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit {
    /// Account being credited
    pub account: String,
    /// Amount as a decimal string
    pub amount: String,
    /// Opaque settlement memo (base64 packet)
    pub memo: String,
}

/// Conditional transfer as proposed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Transfer identifier (the payment id)
    pub id: String,
    pub debits: Vec<Debit>,
    pub credits: Vec<Credit>,
    /// Hash commitment the fulfillment must satisfy
    pub execution_condition: String,
    /// Time after which the ledger may reject the fulfillment
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// CLIENT
// ============================================================================

/// HTTP client for the ledger collaborator.
#[derive(Debug, Clone)]
pub struct LedgerClient {
    client: Client,
    base_url: Url,
}

impl LedgerClient {
    /// Creates a ledger client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Ledger base URL, e.g. `http://127.0.0.1:8014/ledger`
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).context("Invalid ledger base URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Ledger base URL cannot be used as a base: {}", base_url);
        }

        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
        })
    }

    /// Builds `{base_url}/transfers/{id}[/{suffix}]` with the id percent-encoded.
    fn transfer_url(&self, id: &str, suffix: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("Ledger base URL cannot be used as a base"))?;
            segments.pop_if_empty().push("transfers").push(id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    /// Proposes a transfer to the ledger.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Ledger accepted the transfer (2xx)
    /// * `Err(anyhow::Error)` - Transport error or rejection; the error text is the
    ///   ledger's message
    pub async fn open_transfer(&self, transfer: &Transfer) -> Result<()> {
        let url = self.transfer_url(&transfer.id, None)?;

        let response = self
            .client
            .put(url)
            .json(transfer)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Error opening transfer: {}", e))?;

        if !response.status().is_success() {
            let message = failure_message("Error opening transfer, ledger", response).await;
            return Err(anyhow::anyhow!(message));
        }

        Ok(())
    }

    /// Submits the fulfillment for a previously opened transfer.
    ///
    /// # Arguments
    ///
    /// * `id` - Transfer identifier
    /// * `fulfillment` - Fulfillment string, sent as the raw request body
    pub async fn fulfill_transfer(&self, id: &str, fulfillment: &str) -> Result<()> {
        let url = self.transfer_url(id, Some("fulfillment"))?;

        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(fulfillment.to_string())
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Error fulfilling transfer: {}", e))?;

        if !response.status().is_success() {
            let message = failure_message("Error fulfilling transfer, ledger", response).await;
            return Err(anyhow::anyhow!(message));
        }

        Ok(())
    }
}
