//! Generic API structures and handlers
//!
//! This module contains shared structures, the rejection handler, CORS setup
//! and the server itself.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use warp::{http::{Method, StatusCode}, Filter, Rejection, Reply};

use crate::config::Config;
use crate::executor::PaymentExecutor;
use crate::storage::DirectoryUserStore;

// ============================================================================
// SHARED REQUEST/RESPONSE STRUCTURES
// ============================================================================

/// Response envelope for service-level endpoints (health, routing errors).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    pub data: Option<T>,
    /// Error message (if failed)
    pub error: Option<String>,
}

// ============================================================================
// CORS CONFIGURATION
// ============================================================================

/// Creates a CORS filter based on the configured allowed origins.
fn create_cors_filter(allowed_origins: &[String]) -> warp::cors::Builder {
    let methods = vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::OPTIONS,
    ];

    if allowed_origins.iter().any(|origin| origin == "*") {
        warp::cors()
            .allow_any_origin()
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    } else {
        let origins: Vec<&str> = allowed_origins.iter().map(|s| s.as_str()).collect();
        warp::cors()
            .allow_origins(origins)
            .allow_methods(methods)
            .allow_headers(vec!["content-type"])
    }
}

// ============================================================================
// REJECTION HANDLER
// ============================================================================

/// Global rejection handler for all API routes.
///
/// Handlers answer their own validation failures; what reaches this point is
/// routing-level (unknown path, wrong method, oversized body).
///
/// # Arguments
///
/// * `rej` - The warp rejection to handle
///
/// # Returns
///
/// A warp reply with an error response
pub async fn handle_rejection(rej: Rejection) -> Result<impl Reply, std::convert::Infallible> {
    let (status, message) = if rej.is_not_found() {
        (StatusCode::NOT_FOUND, "Endpoint not found".to_string())
    } else if rej.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else if rej.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large".to_string())
    } else if rej.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required".to_string())
    } else {
        error!("Unhandled rejection: {:?}", rej);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        }),
        status,
    ))
}

// ============================================================================
// API SERVER IMPLEMENTATION
// ============================================================================

/// Maximum accepted request body (bytes).
const MAX_BODY_BYTES: u64 = 64 * 1024;

/// REST API server for the SPSP client mock.
pub struct ApiServer {
    /// Service configuration
    config: Arc<Config>,
    /// Payment executor shared by all payment requests
    executor: Arc<PaymentExecutor>,
    /// Directory fixture store
    directory: Arc<DirectoryUserStore>,
}

impl ApiServer {
    /// Creates a new API server.
    ///
    /// # Arguments
    ///
    /// * `config` - Service configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ApiServer)` - Server ready to run
    /// * `Err(anyhow::Error)` - Failed to build the payment executor
    pub fn new(config: Config) -> Result<Self> {
        let executor = PaymentExecutor::new(&config).context("Failed to create payment executor")?;

        Ok(Self {
            config: Arc::new(config),
            executor: Arc::new(executor),
            directory: Arc::new(DirectoryUserStore::seeded()),
        })
    }

    /// Starts the API server and begins handling HTTP requests.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Server stopped
    /// * `Err(anyhow::Error)` - Invalid bind address
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting API server on {}:{}",
            self.config.api.host, self.config.api.port
        );

        let routes = self.create_routes();

        let addr: std::net::SocketAddr = format!("{}:{}", self.config.api.host, self.config.api.port)
            .parse()
            .context("Failed to parse API server address")?;

        warp::serve(routes)
            .run(addr)
            .await;

        Ok(())
    }

    /// Creates all API routes for the server.
    ///
    /// # Returns
    ///
    /// A warp filter containing all API routes
    pub(crate) fn create_routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        use super::{directory, payments};

        // Health check endpoint - returns service status
        let health = warp::path("health").and(warp::get()).map(|| {
            warp::reply::json(&ApiResponse::<String> {
                success: true,
                data: Some("SPSP client mock is running".to_string()),
                error: None,
            })
        });

        // PUT /payments/:id - execute a payment
        let execute_payment = warp::path!("payments" / String)
            .and(warp::put())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and(payments::with_executor(self.executor.clone()))
            .and_then(payments::execute_payment_handler);

        // POST /directory/user/get - resolve a user URI
        let user_get = warp::path!("directory" / "user" / "get")
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and(directory::with_directory(self.directory.clone()))
            .and_then(directory::user_get_handler);

        // POST /directory/user/add - register users
        let user_add = warp::path!("directory" / "user" / "add")
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_BODY_BYTES))
            .and(warp::body::bytes())
            .and(directory::with_directory(self.directory.clone()))
            .and_then(directory::user_add_handler);

        // Combine all routes and apply rejection handler
        health
            .or(execute_payment)
            .or(user_get)
            .or(user_add)
            .with(create_cors_filter(&self.config.api.cors_origins))
            .recover(handle_rejection)
    }

    /// Public method for testing - exposes routes for integration tests
    pub fn test_routes(&self) -> impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone {
        self.create_routes()
    }
}
