//! Receiver Notification Client
//!
//! Tells the receiver-side service that a payment has been executed.
//! Callers treat the outcome as best-effort.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::collaborator::{build_http_client, failure_message};

/// Payment status update sent to the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotification {
    pub payment_id: String,
    pub destination_amount: String,
    pub status: String,
}

/// HTTP client for the receiver collaborator.
#[derive(Debug, Clone)]
pub struct ReceiverClient {
    client: Client,
    base_url: Url,
}

impl ReceiverClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).context("Invalid receiver base URL")?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Receiver base URL cannot be used as a base: {}", base_url);
        }

        Ok(Self {
            client: build_http_client(timeout)?,
            base_url,
        })
    }

    /// Sends `PUT {base_url}/receivers/{receiver}/payments/{paymentId}`.
    ///
    /// # Arguments
    ///
    /// * `receiver` - Receiver short name
    /// * `notification` - Status update; its `payment_id` selects the resource
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Receiver acknowledged (2xx)
    /// * `Err(anyhow::Error)` - Transport error or non-2xx response
    pub async fn notify_payment(&self, receiver: &str, notification: &PaymentNotification) -> Result<()> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Receiver base URL cannot be used as a base"))?
            .pop_if_empty()
            .push("receivers")
            .push(receiver)
            .push("payments")
            .push(&notification.payment_id);

        let response = self
            .client
            .put(url)
            .json(notification)
            .send()
            .await
            .context("Failed to send payment notification")?;

        if !response.status().is_success() {
            let message = failure_message("Error notifying receiver, receiver", response).await;
            return Err(anyhow::anyhow!(message));
        }

        Ok(())
    }
}
