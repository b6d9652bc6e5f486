//! Execution condition helpers
//!
//! A condition is a SHA-256 commitment to the fulfillment pre-image, written as
//! `cc:0:3:<base64url digest>:<pre-image length>`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

/// Derives the execution condition satisfied by `fulfillment`.
pub fn condition_for(fulfillment: &str) -> String {
    let digest = Sha256::digest(fulfillment.as_bytes());
    format!("cc:0:3:{}:{}", URL_SAFE_NO_PAD.encode(digest), fulfillment.len())
}

/// Returns true if `fulfillment` satisfies `condition`.
pub fn verify(condition: &str, fulfillment: &str) -> bool {
    condition_for(fulfillment) == condition
}
