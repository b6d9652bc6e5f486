//! Test module organization
//!
//! This module re-exports test helpers for use in test files.

mod helpers;

#[allow(unused_imports)]
pub use helpers::{
    build_test_config, build_test_config_with_mock_server, decode_memo, lookup_ok, mount_fulfillment, mount_lookup,
    mount_notification, mount_open_transfer, payment_request, requests_to, wait_for_requests,
    DUMMY_DESTINATION_AMOUNT, DUMMY_FULFILLMENT, DUMMY_PAYMENT_ID, DUMMY_RECEIVER_ACCOUNT,
    DUMMY_RECEIVER_NAME, DUMMY_SOURCE_ACCOUNT, DUMMY_SOURCE_AMOUNT, DUMMY_SOURCE_IDENTIFIER,
    LEDGER_PREFIX,
};
