//! Configuration handling for the frame inspector.
//!
//! Settings come from an optional YAML file and are then overridden by
//! environment variables.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Default upper bound on a single frame (16 MiB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// How decoded frames are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One compact JSON object per line
    #[default]
    Json,
    /// Indented JSON
    Pretty,
    /// Human-readable summary line
    Text,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "pretty" => Ok(OutputFormat::Pretty),
            "text" => Ok(OutputFormat::Text),
            other => bail!("unknown output format {:?}", other),
        }
    }
}

/// Frame inspector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Frames longer than this are rejected without decoding
    pub max_frame_size: usize,
    /// Output format for decoded frames
    pub output: OutputFormat,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            output: OutputFormat::Json,
        }
    }
}

/// Root configuration structure (matches the YAML structure)
#[derive(Debug, Deserialize)]
struct RootConfig {
    inspector: Option<InspectorSection>,
}

#[derive(Debug, Deserialize)]
struct InspectorSection {
    max_frame_size: Option<usize>,
    output: Option<OutputFormat>,
}

impl InspectConfig {
    /// Load configuration from an optional file, then apply environment overrides
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path),
            None => Self::default(),
        };

        config.apply_environment_overrides(|name| std::env::var(name).ok());

        info!(
            "Inspector configuration: max_frame_size={}, output={:?}",
            config.max_frame_size, config.output
        );

        Ok(config)
    }

    /// Read settings from a YAML file, falling back to defaults
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Self {
        let mut config = Self::default();

        match std::fs::read_to_string(&config_path) {
            Ok(content) => match serde_yaml::from_str::<RootConfig>(&content) {
                Ok(root_config) => {
                    config.apply_root_config(root_config);
                    info!("Loaded configuration from {:?}", config_path.as_ref());
                }
                Err(e) => {
                    warn!(
                        "Failed to parse config file {:?}, using defaults: {}",
                        config_path.as_ref(),
                        e
                    );
                }
            },
            Err(_) => {
                warn!("Config file {:?} not found, using defaults", config_path.as_ref());
            }
        }

        config
    }

    fn apply_root_config(&mut self, root_config: RootConfig) {
        if let Some(section) = root_config.inspector {
            if let Some(max_frame_size) = section.max_frame_size {
                self.max_frame_size = max_frame_size;
            }
            if let Some(output) = section.output {
                self.output = output;
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_environment_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FRAME_INSPECT_MAX_FRAME_SIZE") {
            match value.parse::<usize>() {
                Ok(size) => {
                    self.max_frame_size = size;
                    info!("Max frame size overridden by environment: {}", size);
                }
                Err(_) => warn!("Ignoring invalid FRAME_INSPECT_MAX_FRAME_SIZE {:?}", value),
            }
        }

        if let Some(value) = lookup("FRAME_INSPECT_OUTPUT") {
            match value.parse::<OutputFormat>() {
                Ok(output) => {
                    self.output = output;
                    info!("Output format overridden by environment: {:?}", output);
                }
                Err(e) => warn!("Ignoring FRAME_INSPECT_OUTPUT: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = InspectConfig::default();
        assert_eq!(config.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_load_from_file() {
        let yaml_content = r#"
inspector:
  max_frame_size: 65536
  output: pretty
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = InspectConfig::load_from_file(temp_file.path());

        assert_eq!(config.max_frame_size, 65536);
        assert_eq!(config.output, OutputFormat::Pretty);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"inspector:\n  output: text\n").unwrap();

        let config = InspectConfig::load_from_file(temp_file.path());

        assert_eq!(config.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_missing_or_invalid_file_uses_defaults() {
        let config = InspectConfig::load_from_file("/nonexistent/frame-inspect.yaml");
        assert_eq!(config, InspectConfig::default());

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"inspector: [not, a, map").unwrap();
        assert_eq!(
            InspectConfig::load_from_file(temp_file.path()),
            InspectConfig::default()
        );
    }

    #[test]
    fn test_environment_overrides() {
        let env: HashMap<&str, &str> = [
            ("FRAME_INSPECT_MAX_FRAME_SIZE", "1024"),
            ("FRAME_INSPECT_OUTPUT", "TEXT"),
        ]
        .into_iter()
        .collect();

        let mut config = InspectConfig::default();
        config.apply_environment_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.max_frame_size, 1024);
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_invalid_environment_values_ignored() {
        let mut config = InspectConfig::default();
        config.apply_environment_overrides(|name| match name {
            "FRAME_INSPECT_MAX_FRAME_SIZE" => Some("lots".to_string()),
            "FRAME_INSPECT_OUTPUT" => Some("xml".to_string()),
            _ => None,
        });
        assert_eq!(config, InspectConfig::default());
    }
}
