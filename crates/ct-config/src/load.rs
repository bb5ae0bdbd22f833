//! Loading model and settings files from disk.

use crate::model::ModelSpec;
use crate::resolve::{resolve_settings, ConfigSource};
use crate::settings::Settings;
use crate::validate::{validate_model_spec, validate_settings, ValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Semantic validation failed for {path}: {source}")]
    ValidationError {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for ct_common::Error {
    fn from(err: ConfigError) -> Self {
        ct_common::Error::Config(err.to_string())
    }
}

/// Settings together with where they came from.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Load and validate a model file.
pub fn load_model(path: &Path) -> Result<ModelSpec, ConfigError> {
    let content = read_file(path)?;
    parse_model(path, &content)
}

/// Parse and validate model JSON that was read from `path`.
pub fn parse_model(path: &Path, content: &str) -> Result<ModelSpec, ConfigError> {
    let model: ModelSpec =
        serde_json::from_str(content).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
    validate_model_spec(&model).map_err(|source| ConfigError::ValidationError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(model)
}

/// Resolve, load and validate settings.
///
/// Falls back to [`Settings::default`] when no settings file is found.
pub fn load_settings(cli_path: Option<&Path>) -> Result<LoadedSettings, ConfigError> {
    let resolved = resolve_settings(cli_path);
    let settings = match &resolved.path {
        Some(path) => {
            let content = read_file(path)?;
            serde_json::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.clone(),
                source,
            })?
        }
        None => Settings::default(),
    };

    validate_settings(&settings).map_err(|source| ConfigError::ValidationError {
        path: resolved
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("<builtin>")),
        source,
    })?;

    Ok(LoadedSettings {
        settings,
        path: resolved.path,
        source: resolved.source,
    })
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_not_found() {
        let err = load_model(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn parse_error_carries_path() {
        let err = parse_model(Path::new("m.json"), "{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("m.json"));
    }

    #[test]
    fn converts_into_common_error() {
        let err: ct_common::Error = ConfigError::NotFound {
            path: PathBuf::from("x.json"),
        }
        .into();
        assert_eq!(err.code(), 10);
    }
}
