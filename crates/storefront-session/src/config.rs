//! # Storefront Configuration
//!
//! Timings and shipping policy for a session.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_CHECKOUT_DURATION_MS=500                                │
//! │     STOREFRONT_AUTH_DELAY_MS=0                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.storefront/... (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     2000 ms checkout, $100 free shipping, $10 flat fee, 1000 ms auth   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [checkout]
//! duration_ms = 2000
//! progress_interval_ms = 50
//!
//! [shipping]
//! free_threshold_cents = 10000
//! flat_fee_cents = 1000
//!
//! [auth]
//! delay_ms = 1000
//!
//! [catalog]
//! featured_count = 6
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use storefront_core::cart::{FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD};
use storefront_core::catalog::DEFAULT_FEATURED_COUNT;
use storefront_core::checkout::DEFAULT_CHECKOUT_DURATION;
use storefront_core::{Money, ShippingPolicy};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "storefront.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";

// =============================================================================
// Checkout Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// How long the simulated payment takes.
    #[serde(default = "default_checkout_duration")]
    pub duration_ms: u64,

    /// How often the progress bar is updated.
    #[serde(default = "default_progress_interval")]
    pub progress_interval_ms: u64,
}

fn default_checkout_duration() -> u64 {
    DEFAULT_CHECKOUT_DURATION.as_millis() as u64
}

fn default_progress_interval() -> u64 {
    50
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            duration_ms: default_checkout_duration(),
            progress_interval_ms: default_progress_interval(),
        }
    }
}

impl CheckoutSettings {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }
}

// =============================================================================
// Shipping Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingSettings {
    /// Subtotal (cents) at which shipping becomes free.
    #[serde(default = "default_free_threshold")]
    pub free_threshold_cents: i64,

    /// Fee (cents) charged below the threshold.
    #[serde(default = "default_flat_fee")]
    pub flat_fee_cents: i64,
}

fn default_free_threshold() -> i64 {
    FREE_SHIPPING_THRESHOLD.cents()
}

fn default_flat_fee() -> i64 {
    FLAT_SHIPPING_FEE.cents()
}

impl Default for ShippingSettings {
    fn default() -> Self {
        ShippingSettings {
            free_threshold_cents: default_free_threshold(),
            flat_fee_cents: default_flat_fee(),
        }
    }
}

impl ShippingSettings {
    pub fn policy(&self) -> ShippingPolicy {
        ShippingPolicy::new(
            Money::from_cents(self.free_threshold_cents),
            Money::from_cents(self.flat_fee_cents),
        )
    }
}

// =============================================================================
// Auth & Catalog Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Simulated latency of sign-in and sign-up.
    #[serde(default = "default_auth_delay")]
    pub delay_ms: u64,
}

fn default_auth_delay() -> u64 {
    1000
}

impl Default for AuthSettings {
    fn default() -> Self {
        AuthSettings {
            delay_ms: default_auth_delay(),
        }
    }
}

impl AuthSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Products shown in the home screen carousel.
    #[serde(default = "default_featured_count")]
    pub featured_count: usize,
}

fn default_featured_count() -> usize {
    DEFAULT_FEATURED_COUNT
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            featured_count: default_featured_count(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub shipping: ShippingSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from TOML text and validates it.
    pub fn from_toml(contents: &str) -> SessionResult<Self> {
        let config: StoreConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`storefront.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SessionError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        if self.checkout.duration_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "checkout.duration_ms must be greater than 0".into(),
            ));
        }

        if self.checkout.progress_interval_ms == 0 {
            return Err(SessionError::InvalidConfig(
                "checkout.progress_interval_ms must be greater than 0".into(),
            ));
        }

        if self.shipping.free_threshold_cents < 0 || self.shipping.flat_fee_cents < 0 {
            return Err(SessionError::InvalidConfig(
                "shipping amounts must not be negative".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
            let raw = std::env::var(name).ok()?;
            match raw.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(var = name, value = %raw, "Ignoring unparsable environment override");
                    None
                }
            }
        }

        if let Some(ms) = parse_env::<u64>("STOREFRONT_CHECKOUT_DURATION_MS") {
            debug!(duration_ms = ms, "Overriding checkout duration from environment");
            self.checkout.duration_ms = ms;
        }

        if let Some(ms) = parse_env::<u64>("STOREFRONT_PROGRESS_INTERVAL_MS") {
            self.checkout.progress_interval_ms = ms;
        }

        if let Some(ms) = parse_env::<u64>("STOREFRONT_AUTH_DELAY_MS") {
            debug!(delay_ms = ms, "Overriding auth delay from environment");
            self.auth.delay_ms = ms;
        }

        if let Some(cents) = parse_env::<i64>("STOREFRONT_FREE_SHIPPING_CENTS") {
            self.shipping.free_threshold_cents = cents;
        }

        if let Some(cents) = parse_env::<i64>("STOREFRONT_FLAT_SHIPPING_CENTS") {
            self.shipping.flat_fee_cents = cents;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Shipping policy built from the `[shipping]` section.
    pub fn shipping_policy(&self) -> ShippingPolicy {
        self.shipping.policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.checkout.duration(), Duration::from_millis(2000));
        assert_eq!(config.auth.delay(), Duration::from_millis(1000));
        assert_eq!(config.shipping_policy(), ShippingPolicy::default());
        assert_eq!(config.catalog.featured_count, 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StoreConfig::from_toml(
            r#"
            [checkout]
            duration_ms = 500

            [shipping]
            flat_fee_cents = 495
            "#,
        )
        .unwrap();

        assert_eq!(config.checkout.duration_ms, 500);
        assert_eq!(config.checkout.progress_interval_ms, 50);
        assert_eq!(config.shipping.flat_fee_cents, 495);
        assert_eq!(config.shipping.free_threshold_cents, 10_000);
        assert_eq!(config.auth.delay_ms, 1000);
    }

    #[test]
    fn test_config_validation() {
        let mut config = StoreConfig::default();

        config.checkout.duration_ms = 0;
        assert!(config.validate().is_err());

        config.checkout.duration_ms = 2000;
        config.checkout.progress_interval_ms = 0;
        assert!(config.validate().is_err());

        config.checkout.progress_interval_ms = 10;
        config.shipping.flat_fee_cents = -1;
        assert!(matches!(
            config.validate(),
            Err(SessionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let err = StoreConfig::from_toml("[checkout\nduration_ms = ").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("storefront-missing-config").join(CONFIG_FILE_NAME);
        let config = StoreConfig::load_or_default(Some(path));
        assert_eq!(config.shipping, ShippingSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("storefront-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join(CONFIG_FILE_NAME);

        let mut config = StoreConfig::default();
        config.shipping.free_threshold_cents = 5_000;
        config.catalog.featured_count = 3;
        config.save(Some(path.clone())).unwrap();

        let loaded = StoreConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.shipping.free_threshold_cents, 5_000);
        assert_eq!(loaded.catalog.featured_count, 3);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_toml_serialization() {
        let config = StoreConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[checkout]"));
        assert!(toml_str.contains("[shipping]"));

        let parsed = StoreConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
