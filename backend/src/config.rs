//! Configuration management for the Rekod Pejabat server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with REKOD_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{QueryOptions, BAYARAN_DEFAULT_YEAR, ITEMS_PER_PAGE};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Record snapshot cache
    pub cache: CacheConfig,

    /// List screen behaviour
    pub listing: ListingConfig,

    /// Public report links
    pub share: ShareConfig,

    /// First administrator account, created when the users table is empty
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// How long a fetched record snapshot stays fresh
    pub ttl_secs: u64,

    /// Background refresh period
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Rows per list page
    pub items_per_page: usize,

    /// Year shown by the payment list without a date filter; 0 disables it
    pub bayaran_default_year: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShareConfig {
    /// HMAC key for share tokens
    pub secret: String,

    /// Lifetime of a public link in days
    pub expiry_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

impl ListingConfig {
    /// Options for lists without a default date constraint
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            items_per_page: self.items_per_page,
            default_year: None,
        }
    }

    /// Options for the payment list
    pub fn bayaran_query_options(&self) -> QueryOptions {
        QueryOptions {
            items_per_page: self.items_per_page,
            default_year: (self.bayaran_default_year > 0).then_some(self.bayaran_default_year),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("REKOD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("cache.ttl_secs", 300)?
            .set_default("cache.refresh_interval_secs", 600)?
            .set_default("listing.items_per_page", ITEMS_PER_PAGE as i64)?
            .set_default("listing.bayaran_default_year", BAYARAN_DEFAULT_YEAR as i64)?
            .set_default("share.expiry_days", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (REKOD_ prefix)
            .add_source(
                Environment::with_prefix("REKOD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
