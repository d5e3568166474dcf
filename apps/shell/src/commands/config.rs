//! # Config Commands
//!
//! Shows the configuration the session runs with and writes it out as a
//! `storefront.toml` the next start will pick up.

use std::path::PathBuf;

use storefront_session::{Session, StoreConfig};
use tracing::info;

use crate::error::ApiError;

pub fn get_config(session: &Session) -> StoreConfig {
    session.config().clone()
}

/// Saves the active configuration; `None` means the platform default path.
pub fn save_config(session: &Session, path: Option<PathBuf>) -> Result<String, ApiError> {
    let target = path.clone().or_else(StoreConfig::default_config_path);
    session.config().save(path)?;

    let shown = target.map_or_else(String::new, |p| p.display().to_string());
    info!(path = %shown, "Config saved from shell");
    Ok(format!("Config saved to {}", shown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_save_writes_loadable_file() {
        let mut config = StoreConfig::default();
        config.catalog.featured_count = 2;
        let session = Session::with_seed_catalog(config).unwrap();

        let dir = std::env::temp_dir().join(format!("storefront-shell-{}", uuid::Uuid::new_v4()));
        let path = dir.join("storefront.toml");

        let message = save_config(&session, Some(path.clone())).unwrap();
        assert!(message.ends_with("storefront.toml"));

        let loaded = StoreConfig::load(Some(path)).unwrap();
        assert_eq!(loaded, get_config(&session));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_save_failure_is_a_config_error() {
        let session = Session::with_seed_catalog(StoreConfig::default()).unwrap();

        // A file where a directory should be.
        let blocker = std::env::temp_dir().join(format!("storefront-blocker-{}", uuid::Uuid::new_v4()));
        std::fs::write(&blocker, "x").unwrap();

        let err = save_config(&session, Some(blocker.join("storefront.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let _ = std::fs::remove_file(blocker);
    }
}
