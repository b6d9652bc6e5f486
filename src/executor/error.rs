//! Payment execution errors

use thiserror::Error;

/// Reason a payment did not execute.
///
/// Variants other than `ReceiverUnavailable` carry the collaborator's message verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Receiver matched the injected failure sentinel; no call was made
    #[error("Error getting receiver details, receiver responded with: 500 Internal Server Error")]
    ReceiverUnavailable,

    #[error("{0}")]
    Lookup(String),

    #[error("{0}")]
    TransferOpen(String),

    /// Fulfillment rejected; the transfer opened before it stays open
    #[error("{0}")]
    TransferFulfill(String),
}

impl PaymentError {
    /// Stable identifier used as the `id` of error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentError::ReceiverUnavailable => "ReceiverUnavailableError",
            PaymentError::Lookup(_) => "LookupError",
            PaymentError::TransferOpen(_) => "TransferOpenError",
            PaymentError::TransferFulfill(_) => "TransferFulfillError",
        }
    }
}
