//! REST API Server Module
//!
//! This module provides the REST API server for the SPSP client mock,
//! exposing payment execution and the central directory fixtures.

// Shared code (health, rejection handling, CORS, server)
mod generic;

// Payment execution endpoint
mod payments;

// Central directory fixture endpoints
mod directory;

pub use generic::{ApiResponse, ApiServer};
pub use payments::{ErrorBody, PaymentBody};
pub use directory::{JsonRpcParseError, UserAddRequest, UserGetRequest};
