//! Configuration for the coordinate system registry.

use crs_common::FIRST_SYNTHESIZED_ID;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the coordinate system registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory holding the EPSG `<table>.bin` files.
    pub catalog_dir: PathBuf,

    /// Directory holding the ESRI definition and digest files, if any.
    pub esri_dir: Option<PathBuf>,

    /// First id handed out to synthesized coordinate systems.
    pub first_synthesized_id: i32,

    /// Register the well-known non-standard codes (900913, 42102) on load.
    pub register_default_aliases: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from("data/epsg"),
            esri_dir: None,
            first_synthesized_id: FIRST_SYNTHESIZED_ID,
            register_default_aliases: true,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CRS_CATALOG_DIR") {
            config.catalog_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("CRS_ESRI_DIR") {
            if !val.is_empty() {
                config.esri_dir = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("CRS_FIRST_SYNTHESIZED_ID") {
            if let Ok(id) = val.parse() {
                config.first_synthesized_id = id;
            }
        }

        if let Ok(val) = std::env::var("CRS_DEFAULT_ALIASES") {
            config.register_default_aliases = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.first_synthesized_id <= 0 {
            return Err("first_synthesized_id must be > 0".to_string());
        }

        if self.catalog_dir.as_os_str().is_empty() {
            return Err("catalog_dir must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.first_synthesized_id, 2_000_000);
        assert!(config.register_default_aliases);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_id() {
        let config = RegistryConfig {
            first_synthesized_id: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{"catalog_dir": "/opt/epsg", "register_default_aliases": false}"#)
                .unwrap();
        assert_eq!(config.catalog_dir, PathBuf::from("/opt/epsg"));
        assert!(!config.register_default_aliases);
        assert_eq!(config.first_synthesized_id, FIRST_SYNTHESIZED_ID);
    }
}
