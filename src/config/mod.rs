//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the SPSP client mock.
//! Configuration includes collaborator endpoints, executor timing settings, and API settings.

use serde::{Deserialize, Serialize};
use url::Url;

/// Longest transfer lifetime accepted by `validate()` (30 days).
pub const MAX_TRANSFER_EXPIRY_SECS: i64 = 30 * 24 * 60 * 60;

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all service settings.
///
/// This structure holds configuration for:
/// - API server binding and CORS
/// - Ledger collaborator (transfer open / fulfillment)
/// - Receiver collaborator (payment notifications)
/// - Payment executor timing and fault injection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration (host, port, CORS settings)
    pub api: ApiConfig,
    /// Ledger collaborator configuration
    pub ledger: LedgerConfig,
    /// Receiver notification collaborator configuration
    pub receiver: ReceiverConfig,
    /// Payment executor settings
    pub executor: ExecutorConfig,
}

/// API server configuration for external communication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host address to bind the API server to
    pub host: String,
    /// Port number to bind the API server to
    pub port: u16,
    /// Allowed CORS origins for cross-origin requests
    pub cors_origins: Vec<String>,
}

/// Ledger collaborator endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Base URL of the ledger (transfers are addressed as `{base_url}/transfers/{id}`)
    pub base_url: String,
}

/// Receiver notification collaborator endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Base URL of the receiver service
    pub base_url: String,
}

/// Payment executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Upper bound for each downstream step in milliseconds
    pub step_timeout_ms: u64,
    /// Lifetime of an opened transfer before the ledger may expire it, in seconds
    pub transfer_expiry_secs: i64,
    /// Fulfillment pre-image submitted to the ledger
    pub fulfillment: String,
    /// Receiver short name that triggers a simulated lookup failure.
    /// `None` (or an empty string) disables the injected fault.
    #[serde(default)]
    pub fail_receiver: Option<String>,
}

impl ExecutorConfig {
    /// Returns the configured failure sentinel, ignoring empty values.
    pub fn fault_receiver(&self) -> Option<&str> {
        self.fail_receiver
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl Config {
    /// Validates the configuration.
    ///
    /// This function ensures that:
    /// - Ledger and receiver base URLs parse as absolute http(s) URLs
    /// - The API port, step timeout and transfer expiry are non-zero
    /// - The transfer expiry is at most `MAX_TRANSFER_EXPIRY_SECS`
    /// - The fulfillment pre-image is not empty
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Configuration is valid
    /// - `Err(anyhow::Error)` - A field is invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_base_url("ledger.base_url", &self.ledger.base_url)?;
        validate_base_url("receiver.base_url", &self.receiver.base_url)?;

        if self.api.port == 0 {
            anyhow::bail!("Configuration error: api.port must be greater than zero");
        }
        if self.executor.step_timeout_ms == 0 {
            anyhow::bail!("Configuration error: executor.step_timeout_ms must be greater than zero");
        }
        if self.executor.transfer_expiry_secs <= 0 {
            anyhow::bail!("Configuration error: executor.transfer_expiry_secs must be greater than zero");
        }
        if self.executor.transfer_expiry_secs > MAX_TRANSFER_EXPIRY_SECS {
            anyhow::bail!(
                "Configuration error: executor.transfer_expiry_secs must not exceed {}",
                MAX_TRANSFER_EXPIRY_SECS
            );
        }
        if self.executor.fulfillment.is_empty() {
            anyhow::bail!("Configuration error: executor.fulfillment must not be empty");
        }

        Ok(())
    }

    /// Loads configuration from the TOML file.
    ///
    /// This function:
    /// 1. Checks if config/spsp_client.toml (or `SPSP_CLIENT_CONFIG_PATH`) exists
    /// 2. If it exists, loads and parses the configuration
    /// 3. Validates the configuration
    /// 4. If it doesn't exist, returns an error asking user to copy template
    ///
    /// # Returns
    ///
    /// - `Ok(Config)` - Successfully loaded and validated configuration
    /// - `Err(anyhow::Error)` - Failed to load configuration, file doesn't exist, or validation failed
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("SPSP_CLIENT_CONFIG_PATH")
            .unwrap_or_else(|_| "config/spsp_client.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/spsp_client.template.toml config/spsp_client.toml\n\
                Then edit config/spsp_client.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Creates a default configuration pointing at local mock collaborators.
    ///
    /// Suitable for local development and testing.
    pub fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8021,
                cors_origins: vec!["*".to_string()],
            },
            ledger: LedgerConfig {
                base_url: "http://127.0.0.1:8014/ledger".to_string(),
            },
            receiver: ReceiverConfig {
                base_url: "http://127.0.0.1:8016".to_string(),
            },
            executor: ExecutorConfig {
                step_timeout_ms: 5000,
                transfer_expiry_secs: 10,
                fulfillment: "HS8e5Ew02XKAglyus2dh2Ohabuqmy3HDM8EXMLz22ok".to_string(),
                fail_receiver: Some("fail".to_string()),
            },
        }
    }
}

/// Validates that a collaborator base URL is an absolute http(s) URL.
///
/// # Arguments
///
/// * `field` - Config field name used in the error message
/// * `value` - URL to check
fn validate_base_url(field: &str, value: &str) -> anyhow::Result<()> {
    let url = Url::parse(value)
        .map_err(|e| anyhow::anyhow!("Configuration error: {} is not a valid URL: {}", field, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("Configuration error: {} must use http or https (got {})", field, other),
    }
}
