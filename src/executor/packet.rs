//! Settlement memo encoding
//!
//! Stands in for the packet-encoding collaborator: the memo attached to the
//! credit leg is a base64 JSON packet naming the payee account, the amount and
//! a header set binding the payment id and sender.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const HEADER_PAYMENT_ID: &str = "Payment-Id";
pub const HEADER_SENDER_IDENTIFIER: &str = "Sender-Identifier";
pub const HEADER_MEMO: &str = "Memo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketData {
    pub headers: BTreeMap<String, String>,
}

/// Decoded settlement packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub account: String,
    pub amount: String,
    pub data: PacketData,
}

/// Encodes a packet into the opaque base64 memo blob.
pub fn encode(account: &str, amount: &str, headers: BTreeMap<String, String>) -> serde_json::Result<String> {
    let packet = Packet {
        account: account.to_string(),
        amount: amount.to_string(),
        data: PacketData { headers },
    };
    Ok(STANDARD.encode(serde_json::to_vec(&packet)?))
}

