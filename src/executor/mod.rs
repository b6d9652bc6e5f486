//! Payment Executor
//!
//! Simulates money movement for one payment by driving a fixed pipeline of
//! collaborator calls.
//!
//! Flow:
//! 1. **Init**: Derive the receiver short name from the receiver URI. The injected
//!    failure sentinel (default `fail`) aborts here without any network call.
//! 2. **Resolved**: Look up the receiver URI to obtain the account to credit.
//! 3. **Opened**: Propose a conditional transfer to the ledger, debiting the source
//!    account and crediting the receiver's account by the destination amount.
//! 4. **Fulfilled**: Submit the fulfillment for the same transfer.
//! 5. **Notified**: Dispatch the receiver notification. It runs as a detached task,
//!    so this state means the notification was handed off, not delivered; its
//!    outcome never reaches the caller.
//!
//! The first failing step moves the execution to **Failed** and skips the rest.
//! Nothing is retried and an opened transfer is not rolled back when fulfillment fails.

pub mod condition;
pub mod error;
pub mod packet;

pub use error::PaymentError;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::{Config, ExecutorConfig};
use crate::directory_client::DirectoryClient;
use crate::ledger_client::{Credit, Debit, LedgerClient, Transfer};
use crate::receiver_client::{PaymentNotification, ReceiverClient};

/// Status reported for a payment whose transfer was fulfilled.
pub const STATUS_EXECUTED: &str = "executed";

const CLIENT_TIMEOUT_GRACE: Duration = Duration::from_secs(1);

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A payment to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_id: String,
    #[serde(rename = "receiver")]
    pub receiver_uri: String,
    pub source_account: String,
    pub source_amount: String,
    pub destination_amount: String,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub source_identifier: Option<String>,
    /// Execution condition to use instead of the one derived from the fulfillment
    #[serde(default)]
    pub condition: Option<String>,
}

/// Outcome of an executed payment. Echoes the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub payment_id: String,
    #[serde(rename = "receiver")]
    pub receiver_uri: String,
    pub source_account: String,
    pub source_amount: String,
    pub destination_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_identifier: Option<String>,
    pub condition: String,
    pub fulfillment: String,
    pub status: String,
}

/// Pipeline position of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentState {
    Init,
    Resolved,
    Opened,
    Fulfilled,
    /// Notification task spawned; delivery is only visible in logs
    Notified,
    Failed,
}

/// Record of one call to [`PaymentExecutor::execute_traced`].
#[derive(Debug)]
pub struct PaymentExecution {
    /// Result returned to the payer
    pub outcome: Result<PaymentResult, PaymentError>,
    /// States visited, starting with `Init`
    pub history: Vec<PaymentState>,
    /// Detached receiver notification, present once the transfer is fulfilled
    pub notification: Option<JoinHandle<()>>,
}

impl PaymentExecution {
    /// Last state reached.
    pub fn state(&self) -> PaymentState {
        self.history.last().copied().unwrap_or(PaymentState::Init)
    }
}

/// Returns the last non-empty path segment of a receiver URI.
///
/// A URL without a path (`http://host/`) has no name and yields an empty string.
/// Falls back to splitting the raw string on `/` when it does not parse as a URL.
pub fn receiver_name(receiver_uri: &str) -> String {
    match Url::parse(receiver_uri) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or_default()
            .to_string(),
        Err(_) => receiver_uri
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

// ============================================================================
// EXECUTOR
// ============================================================================

/// Executes payments against the directory, ledger and receiver collaborators.
///
/// Holds no per-payment state; one instance serves concurrent requests.
#[derive(Debug, Clone)]
pub struct PaymentExecutor {
    directory: DirectoryClient,
    ledger: LedgerClient,
    receiver: ReceiverClient,
    settings: ExecutorConfig,
}

impl PaymentExecutor {
    /// Creates an executor from the service configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(PaymentExecutor)` - Clients created
    /// * `Err(anyhow::Error)` - Invalid collaborator URL or HTTP client failure
    pub fn new(config: &Config) -> Result<Self> {
        // Transport timeout trails the step timeout so expiry is reported per step
        let timeout = Duration::from_millis(config.executor.step_timeout_ms) + CLIENT_TIMEOUT_GRACE;

        Ok(Self {
            directory: DirectoryClient::new(timeout)?,
            ledger: LedgerClient::new(&config.ledger.base_url, timeout)?,
            receiver: ReceiverClient::new(&config.receiver.base_url, timeout)?,
            settings: config.executor.clone(),
        })
    }

    fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.settings.step_timeout_ms)
    }

    /// Executes a payment and returns only the payer-facing result.
    pub async fn execute(&self, request: PaymentRequest) -> Result<PaymentResult, PaymentError> {
        self.execute_traced(request).await.outcome
    }

    /// Executes a payment and returns the full execution record.
    pub async fn execute_traced(&self, request: PaymentRequest) -> PaymentExecution {
        let mut history = vec![PaymentState::Init];
        debug!("Payment {}: {:?}", request.payment_id, PaymentState::Init);

        match self.settle(&request, &mut history).await {
            Ok(result) => {
                let notification = self.spawn_notification(&request);
                advance(&request.payment_id, &mut history, PaymentState::Notified);
                info!(
                    "Payment {} executed: {} from {} to {}",
                    result.payment_id, result.destination_amount, result.source_account, result.receiver_uri
                );
                PaymentExecution {
                    outcome: Ok(result),
                    history,
                    notification: Some(notification),
                }
            }
            Err(e) => {
                error!("Payment {} failed ({}): {}", request.payment_id, e.kind(), e);
                advance(&request.payment_id, &mut history, PaymentState::Failed);
                PaymentExecution {
                    outcome: Err(e),
                    history,
                    notification: None,
                }
            }
        }
    }

    /// Runs steps 1-4. Each step only starts if the previous one succeeded.
    async fn settle(
        &self,
        request: &PaymentRequest,
        history: &mut Vec<PaymentState>,
    ) -> Result<PaymentResult, PaymentError> {
        let receiver = receiver_name(&request.receiver_uri);
        if self.settings.fault_receiver() == Some(receiver.as_str()) {
            return Err(PaymentError::ReceiverUnavailable);
        }

        let details = self
            .bounded("Receiver lookup", self.directory.lookup(&request.receiver_uri))
            .await
            .map_err(PaymentError::Lookup)?;
        advance(&request.payment_id, history, PaymentState::Resolved);

        let fulfillment = self.settings.fulfillment.clone();
        let transfer = self.build_transfer(request, &details.account, &fulfillment)?;
        self.bounded("Transfer open", self.ledger.open_transfer(&transfer))
            .await
            .map_err(PaymentError::TransferOpen)?;
        advance(&request.payment_id, history, PaymentState::Opened);

        self.bounded(
            "Transfer fulfillment",
            self.ledger.fulfill_transfer(&transfer.id, &fulfillment),
        )
        .await
        .map_err(PaymentError::TransferFulfill)?;
        advance(&request.payment_id, history, PaymentState::Fulfilled);

        Ok(PaymentResult {
            payment_id: request.payment_id.clone(),
            receiver_uri: request.receiver_uri.clone(),
            source_account: request.source_account.clone(),
            source_amount: request.source_amount.clone(),
            destination_amount: request.destination_amount.clone(),
            memo: request.memo.clone(),
            source_identifier: request.source_identifier.clone(),
            condition: transfer.execution_condition,
            fulfillment,
            status: STATUS_EXECUTED.to_string(),
        })
    }

    /// Builds the ledger transfer: the source account is debited and the receiver's
    /// account credited, both by the destination amount.
    fn build_transfer(
        &self,
        request: &PaymentRequest,
        credit_account: &str,
        fulfillment: &str,
    ) -> Result<Transfer, PaymentError> {
        let mut headers = BTreeMap::new();
        headers.insert(packet::HEADER_PAYMENT_ID.to_string(), request.payment_id.clone());
        if let Some(sender) = &request.source_identifier {
            headers.insert(packet::HEADER_SENDER_IDENTIFIER.to_string(), sender.clone());
        }
        if let Some(memo) = &request.memo {
            headers.insert(packet::HEADER_MEMO.to_string(), memo.clone());
        }
        let memo = packet::encode(credit_account, &request.destination_amount, headers)
            .map_err(|e| PaymentError::TransferOpen(format!("Error encoding settlement memo: {}", e)))?;

        let execution_condition = match &request.condition {
            Some(supplied) => {
                if !condition::verify(supplied, fulfillment) {
                    warn!(
                        "Payment {}: supplied condition is not satisfied by the configured fulfillment",
                        request.payment_id
                    );
                }
                supplied.clone()
            }
            None => condition::condition_for(fulfillment),
        };

        let expires_at = chrono::Duration::try_seconds(self.settings.transfer_expiry_secs)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                PaymentError::TransferOpen(format!(
                    "Transfer expiry of {}s is out of range",
                    self.settings.transfer_expiry_secs
                ))
            })?;

        Ok(Transfer {
            id: request.payment_id.clone(),
            debits: vec![Debit {
                account: request.source_account.clone(),
                amount: request.destination_amount.clone(),
            }],
            credits: vec![Credit {
                account: credit_account.to_string(),
                amount: request.destination_amount.clone(),
                memo,
            }],
            execution_condition,
            expires_at,
        })
    }

    /// Awaits a collaborator call under the step timeout.
    ///
    /// Errors are flattened to the message reported to the payer.
    async fn bounded<T>(
        &self,
        step: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T, String> {
        let timeout = self.step_timeout();
        match tokio::time::timeout(timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("{} timed out after {}ms", step, timeout.as_millis())),
        }
    }

    /// Sends the receiver notification on a detached task.
    fn spawn_notification(&self, request: &PaymentRequest) -> JoinHandle<()> {
        let client = self.receiver.clone();
        let timeout = self.step_timeout();
        let receiver = receiver_name(&request.receiver_uri);
        let notification = PaymentNotification {
            payment_id: request.payment_id.clone(),
            destination_amount: request.destination_amount.clone(),
            status: STATUS_EXECUTED.to_string(),
        };

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, client.notify_payment(&receiver, &notification)).await {
                Ok(Ok(())) => debug!(
                    "Notified receiver {} of payment {}",
                    receiver, notification.payment_id
                ),
                Ok(Err(e)) => warn!(
                    "Failed to notify receiver {} of payment {}: {}",
                    receiver, notification.payment_id, e
                ),
                Err(_) => warn!(
                    "Notification of payment {} to receiver {} timed out after {}ms",
                    notification.payment_id,
                    receiver,
                    timeout.as_millis()
                ),
            }
        })
    }
}

fn advance(payment_id: &str, history: &mut Vec<PaymentState>, next: PaymentState) {
    debug!("Payment {}: {:?} -> {:?}", payment_id, history.last(), next);
    history.push(next);
}
