//! Tool configuration for the `field-schema` binary.
//!
//! Defines the YAML-serializable settings for output rendering and log
//! filtering. Every section is optional; missing values take defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! output:
//!   format: yaml
//!   pretty: true
//! logging:
//!   filter: field_schema_core=debug
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DocumentFormat;
use crate::error::{DocumentError, Result};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".field-schema.yml";

/// Config format version written by [`ToolConfig::default`].
pub const CONFIG_VERSION: &str = "1.0";

/// How results are printed.
///
/// # Examples
///
/// ```
/// # use field_schema_document::{DocumentFormat, OutputConfig};
/// let output = OutputConfig::default();
/// assert_eq!(output.format, DocumentFormat::Json);
/// assert!(output.pretty);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format for accepted definitions and error reports.
    pub format: DocumentFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: DocumentFormat::Json,
            pretty: true,
        }
    }
}

/// Log filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Top-level tool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ToolConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DocumentError::IoError) if the file cannot
    /// be read, [`YamlError`](crate::DocumentError::YamlError) if parsing
    /// fails, or [`InvalidConfig`](crate::DocumentError::InvalidConfig) if the
    /// version is empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: ToolConfig = serde_yaml::from_reader(reader)?;
        if config.version.trim().is_empty() {
            return Err(DocumentError::InvalidConfig(
                "version cannot be empty".to_string(),
            ));
        }
        Ok(config)
    }

    /// Loads `path` if given, else [`DEFAULT_CONFIG_FILE`] from `dir` when it
    /// exists, else returns defaults.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ToolConfig::load`]; an explicitly given path
    /// that does not exist is an error.
    pub fn discover(path: Option<&Path>, dir: impl AsRef<Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DocumentError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::DocumentError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
output:
  format: yaml
  pretty: false
logging:
  filter: field_schema_core=debug
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: ToolConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.output.format, DocumentFormat::Yaml);
        assert!(!config.output.pretty);
        assert_eq!(config.logging.filter, "field_schema_core=debug");
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let config: ToolConfig = serde_yaml::from_str("output:\n  format: text\n").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.output.format, DocumentFormat::Text);
        assert!(config.output.pretty);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = serde_yaml::from_str::<ToolConfig>("output:\n  format: xml\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let original: ToolConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = ToolConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_rejects_empty_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "version: \"\"\n").unwrap();

        assert!(matches!(
            ToolConfig::load(&path),
            Err(DocumentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, ToolConfig::default());

        let mut custom = ToolConfig::default();
        custom.output.pretty = false;
        custom.save(dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        let config = ToolConfig::discover(None, dir.path()).unwrap();
        assert!(!config.output.pretty);

        let missing = dir.path().join("missing.yml");
        assert!(ToolConfig::discover(Some(missing.as_path()), dir.path()).is_err());
    }
}
