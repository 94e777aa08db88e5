// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::presets::Preset;
use crate::config::registry::{self, Configuration};
use crate::errors::ConfigurationError;
use crate::facility::{FacilityTable, Level};
use crate::sinks::{StreamSink, TracingSink};
use crate::traits::Sink;

/// Logging configuration as written in a YAML file.
///
/// All fields are optional. Monitors are code and cannot be configured here;
/// register them with [`Configuration::monitor`].
///
/// # Fields
/// * `preset` - processor chain to use (`minimal`, `dev`, `json`; defaults to `dev`)
/// * `sink` - where events go (`stdout`, `stderr`, `tracing`; defaults to `stdout`)
/// * `key_prefix` - prefix for un-dotted field keys when `WOODCHIPPER_KEY_PREFIX` is unset
/// * `facilities` - minimum level per logger-name prefix, `""` being the catch-all
///
/// # Example
/// ```yaml
/// preset: json
/// sink: stderr
/// key_prefix: orders
/// facilities:
///   "": INFO
///   app.db: WARNING
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub preset: Preset,
    pub sink: SinkTarget,
    pub key_prefix: Option<String>,
    pub facilities: BTreeMap<String, String>,
}

/// Destination named in a configuration file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkTarget {
    #[default]
    Stdout,
    Stderr,
    Tracing,
}

impl SinkTarget {
    pub fn build(&self) -> Arc<dyn Sink> {
        match self {
            SinkTarget::Stdout => Arc::new(StreamSink::stdout()),
            SinkTarget::Stderr => Arc::new(StreamSink::stderr()),
            SinkTarget::Tracing => Arc::new(TracingSink),
        }
    }
}

impl LoggingConfig {
    /// Parse every facility level, reporting the first unknown one.
    pub fn facility_table(&self) -> Result<FacilityTable, ConfigurationError> {
        self.facilities
            .iter()
            .map(|(facility, level)| {
                level
                    .parse::<Level>()
                    .map(|level| (facility.as_str(), level))
                    .map_err(|_| ConfigurationError::UnknownLevel {
                        facility: facility.clone(),
                        level: level.clone(),
                    })
            })
            .collect()
    }

    pub fn into_configuration(self) -> Result<Configuration, ConfigurationError> {
        let facilities = self.facility_table()?;
        let mut configuration = Configuration::preset(self.preset)
            .sink(self.sink.build())
            .facilities(facilities);
        if let Some(prefix) = self.key_prefix.filter(|p| !p.is_empty()) {
            configuration = configuration.key_prefix(prefix);
        }
        Ok(configuration)
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LoggingConfig, ConfigurationError> {
    let path = path.as_ref();
    let load_error = |reason: String| ConfigurationError::Load {
        source_name: path.display().to_string(),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
    if content.trim().is_empty() {
        return Ok(LoggingConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|e| load_error(e.to_string()))
}

/// Load a config from a YAML file and check that every facility level is known.
pub fn load_and_validate_config<P: AsRef<Path>>(
    path: P,
) -> Result<LoggingConfig, ConfigurationError> {
    let cfg = load_config(path)?;
    cfg.facility_table()?;
    Ok(cfg)
}

/// Load, validate and apply a YAML configuration file.
pub fn configure_from_file<P: AsRef<Path>>(path: P) -> Result<(), ConfigurationError> {
    let configuration = load_and_validate_config(path)?.into_configuration()?;
    registry::configure(configuration);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
preset: json
sink: stderr
key_prefix: orders
facilities:
  "": INFO
  app.db: warn
"#;

        let cfg: LoggingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.preset, Preset::Json);
        assert_eq!(cfg.sink, SinkTarget::Stderr);
        assert_eq!(cfg.key_prefix.as_deref(), Some("orders"));

        let table = cfg.facility_table().unwrap();
        assert_eq!(table.get(""), Some(Level::Info));
        assert_eq!(table.get("app.db"), Some(Level::Warning));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let cfg: LoggingConfig = serde_yaml::from_str("facilities: {}").unwrap();
        assert_eq!(cfg.preset, Preset::Dev);
        assert_eq!(cfg.sink, SinkTarget::Stdout);
        assert!(cfg.key_prefix.is_none());
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let file = write_config("preset: minimal\nfacilities:\n  loader_test: DEBUG\n");

        let result = load_and_validate_config(file.path());
        assert!(result.is_ok());
        assert_eq!(result.unwrap().preset, Preset::Minimal);
    }

    #[test]
    fn test_empty_file_is_default_config() {
        let file = write_config("");
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.preset, Preset::Dev);
        assert!(cfg.facilities.is_empty());
    }

    #[test]
    fn test_load_and_validate_unknown_level() {
        let file = write_config("facilities:\n  app: LOUD\n");

        let error = load_and_validate_config(file.path()).unwrap_err();
        assert_eq!(
            error,
            ConfigurationError::UnknownLevel {
                facility: "app".to_string(),
                level: "LOUD".to_string(),
            }
        );
    }

    #[test]
    fn test_load_errors_name_the_source() {
        let test_cases = vec![
            ("preset: [not, a, preset]\n", "invalid type"),
            ("preset: verbose\n", "unknown variant"),
        ];

        for (yaml, expected) in test_cases {
            let file = write_config(yaml);
            match load_config(file.path()) {
                Err(ConfigurationError::Load {
                    source_name,
                    reason,
                }) => {
                    assert_eq!(source_name, file.path().display().to_string());
                    assert!(reason.contains(expected), "{} should mention {}", reason, expected);
                }
                other => panic!("expected load error for {:?}, got {:?}", yaml, other),
            }
        }
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/woodchipper.yaml");
        assert!(matches!(result, Err(ConfigurationError::Load { .. })));
    }

    #[test]
    fn test_configure_from_file_merges_facilities() {
        let _guard = registry::exclusive();
        let file = write_config("preset: minimal\nsink: tracing\nfacilities:\n  loader_test.merged: ERROR\n");

        configure_from_file(file.path()).unwrap();
        assert_eq!(
            registry::get_facilities().get("loader_test.merged"),
            Some(Level::Error)
        );
        assert_eq!(registry::active_pipeline().sink().name(), "tracing");
        registry::reset();
    }
}
