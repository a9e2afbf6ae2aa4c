#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{
    validate_base_url, validate_non_empty_string, validate_path, validate_positive_number,
    validate_selector, validate_url, Validate,
};
use serde::Deserialize;
use std::path::Path;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const DEFAULT_PORT: u16 = 3000;

/// Relay configuration, loaded from an optional TOML file.
///
/// Every section and key may be omitted; defaults point at the public
/// collector and marketplace.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub analytics: AnalyticsConfig,
    pub marketplace: MarketplaceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub store_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: "public".to_string(),
            store_path: "tracked_items.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub endpoint: String,
    pub measurement_id: String,
    pub api_secret: Option<String>,
    pub client_id: String,
    pub page_title: String,
    pub timeout_seconds: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.google-analytics.com/mp/collect".to_string(),
            measurement_id: "G-2ZPVT8VYJT".to_string(),
            api_secret: None,
            client_id: "anon".to_string(),
            page_title: "eBay Listing".to_string(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    pub item_base_url: String,
    pub title_selector: String,
    pub image_selector: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub concurrent_requests: usize,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            item_base_url: "https://www.ebay.com/itm/".to_string(),
            title_selector: "h1.x-item-title__mainTitle span".to_string(),
            image_selector: "div.ux-image-carousel-item img".to_string(),
            user_agent: concat!("pixel-relay/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 10,
            concurrent_requests: 4,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` with the value of the environment variable `VAR`.
/// Unset variables are left as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
        message: format!("env placeholder pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_path("server.static_dir", &self.server.static_dir)?;
        validate_path("server.store_path", &self.server.store_path)?;

        validate_url("analytics.endpoint", &self.analytics.endpoint)?;
        validate_non_empty_string("analytics.measurement_id", &self.analytics.measurement_id)?;
        validate_non_empty_string("analytics.client_id", &self.analytics.client_id)?;
        validate_positive_number("analytics.timeout_seconds", self.analytics.timeout_seconds, 1)?;

        validate_base_url("marketplace.item_base_url", &self.marketplace.item_base_url)?;
        validate_selector("marketplace.title_selector", &self.marketplace.title_selector)?;
        validate_selector("marketplace.image_selector", &self.marketplace.image_selector)?;
        validate_positive_number(
            "marketplace.timeout_seconds",
            self.marketplace.timeout_seconds,
            1,
        )?;
        validate_positive_number(
            "marketplace.concurrent_requests",
            self.marketplace.concurrent_requests as u64,
            1,
        )?;

        Ok(())
    }
}
