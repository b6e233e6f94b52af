//! Loading backward options from YAML

use super::schema::BackwardOptions;
use super::validate::validate_options;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

impl BackwardOptions {
    /// Parse and validate options from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: BackwardOptions = serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {}", e)))?;

        validate_options(&options)
            .map_err(|e| Error::ConfigError(format!("Invalid config: {}", e)))?;

        Ok(options)
    }

    /// Serialize to YAML
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}

/// Load backward options from a YAML file
pub fn load_options<P: AsRef<Path>>(config_path: P) -> Result<BackwardOptions> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    BackwardOptions::from_yaml_str(&yaml_content)
}
