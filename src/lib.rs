//! SPSP Client Mock Library
//!
//! A mock SPSP client used by payment integration suites. It executes payments
//! by resolving the receiver, opening and fulfilling a conditional transfer on
//! the ledger and notifying the receiver, and it serves the central directory
//! fixtures. No real funds or cryptographic verification are involved.

pub mod api;
pub mod collaborator;
pub mod config;
pub mod directory_client;
pub mod executor;
pub mod ledger_client;
pub mod receiver_client;
pub mod storage;

// Re-export commonly used types
pub use config::{ApiConfig, Config, ExecutorConfig, LedgerConfig, ReceiverConfig};
pub use executor::{PaymentError, PaymentExecutor, PaymentRequest, PaymentResult, PaymentState};
