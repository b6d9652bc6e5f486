//! SPSP Client Mock Service
//!
//! A mock service that simulates the SPSP client and central directory APIs
//! for payment integration testing.
//!
//! ## Overview
//!
//! The service:
//! 1. Executes payments (`PUT /payments/:id`) by resolving the receiver, opening
//!    and fulfilling a ledger transfer and notifying the receiver
//! 2. Serves the central directory fixtures (`/directory/user/get`, `/directory/user/add`)
//! 3. Reports liveness on `/health`

use anyhow::Result;
use tracing::info;

use spsp_client::api::ApiServer;
use spsp_client::config::Config;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

/// Main application entry point.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration from TOML file
/// 3. Starts the API server and runs until shutdown
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting SPSP Client Mock Service");

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("SPSP Client Mock Service");
        println!();
        println!("Usage: spsp-client [OPTIONS]");
        println!();
        println!("Options:");
        println!("  --config <path>   Use custom config file path");
        println!("  --help, -h        Show this help message");
        println!();
        println!("Environment variables:");
        println!("  SPSP_CLIENT_CONFIG_PATH    Path to config file (overrides --config)");
        return Ok(());
    }

    // Environment variable wins over the flag
    if std::env::var("SPSP_CLIENT_CONFIG_PATH").is_err() {
        if let Some(path) = args
            .iter()
            .position(|arg| arg == "--config")
            .and_then(|i| args.get(i + 1))
        {
            std::env::set_var("SPSP_CLIENT_CONFIG_PATH", path);
            info!("Using custom config: {}", path);
        }
    }

    let config = Config::load()?;
    info!("Configuration loaded successfully");

    let api_server = ApiServer::new(config)?;

    // Run the service (this blocks until shutdown)
    api_server.run().await?;

    Ok(())
}
