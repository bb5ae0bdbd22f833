//! ctree configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for model files and settings.json
//! - Settings resolution (CLI → env → XDG → defaults)
//! - Semantic validation of models and settings

pub mod load;
pub mod model;
pub mod resolve;
pub mod settings;
pub mod validate;

pub use load::{load_model, load_settings, ConfigError, LoadedSettings};
pub use model::{ContextSpec, ModelSpec};
pub use resolve::{resolve_settings, ConfigSource, SettingsPath};
pub use settings::{ResponseAlignment, Settings};
pub use validate::{ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
