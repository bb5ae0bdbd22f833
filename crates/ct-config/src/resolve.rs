//! Settings file discovery.
//!
//! Candidates, first hit wins:
//! 1. `--settings <path>` (taken even when missing, so loading reports it)
//! 2. `$CTREE_SETTINGS`
//! 3. `$CTREE_CONFIG_DIR/settings.json`
//! 4. `<config dir>/ctree/settings.json` (XDG on Linux, via `dirs`)
//! 5. built-in defaults

use std::path::{Path, PathBuf};

const ENV_SETTINGS_PATH: &str = "CTREE_SETTINGS";
const ENV_CONFIG_DIR: &str = "CTREE_CONFIG_DIR";
const SETTINGS_FILENAME: &str = "settings.json";
const APP_NAME: &str = "ctree";

/// Which candidate supplied the settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    Environment,
    XdgConfig,
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConfigSource::CliArgument => "--settings",
            ConfigSource::Environment => "env",
            ConfigSource::XdgConfig => "user config dir",
            ConfigSource::BuiltinDefault => "defaults",
        })
    }
}

/// Resolved settings location; `path` is `None` for built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPath {
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Find the settings file to load.
pub fn resolve_settings(cli_path: Option<&Path>) -> SettingsPath {
    if let Some(path) = cli_path {
        return SettingsPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    let env_file = std::env::var_os(ENV_SETTINGS_PATH).map(PathBuf::from);
    let env_dir = std::env::var_os(ENV_CONFIG_DIR).map(|d| PathBuf::from(d).join(SETTINGS_FILENAME));
    let user_dir = xdg_config_dir().map(|d| d.join(SETTINGS_FILENAME));

    [
        (env_file, ConfigSource::Environment),
        (env_dir, ConfigSource::Environment),
        (user_dir, ConfigSource::XdgConfig),
    ]
    .into_iter()
    .find_map(|(candidate, source)| {
        candidate
            .filter(|path| path.is_file())
            .map(|path| SettingsPath {
                path: Some(path),
                source,
            })
    })
    .unwrap_or_default()
}

/// Per-user config directory for ctree.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
