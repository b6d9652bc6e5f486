//! Storage Module
//!
//! In-memory storage for the directory fixture service.

pub mod directory_users;

// Re-export for convenience
pub use directory_users::{DirectoryUser, DirectoryUserStore};
