//! Log level and format resolution.
//!
//! Lowest to highest precedence: built-in defaults, `RUST_LOG`, `CT_LOG` and
//! `CT_LOG_FORMAT`, then the `-v`/`-q`/`--log-format` flags.

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

/// Shape of log lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Jsonl,
}

impl LogFormat {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Some(LogFormat::Human),
            "jsonl" | "json" => Some(LogFormat::Jsonl),
            _ => None,
        }
    }
}

/// Filter implied by `-v` (repeatable) and `-q`.
///
/// Returns `None` when neither flag was given.
pub fn verbosity_filter(verbose: u8, quiet: bool) -> Option<LevelFilter> {
    match (quiet, verbose) {
        (true, _) => Some(LevelFilter::ERROR),
        (false, 0) => None,
        (false, 1) => Some(LevelFilter::DEBUG),
        (false, _) => Some(LevelFilter::TRACE),
    }
}

/// Most verbose level named anywhere in a `RUST_LOG`-style directive list,
/// e.g. `warn,ct_core=debug` gives `DEBUG`.
fn most_verbose_directive(directives: &str) -> Option<LevelFilter> {
    directives
        .split(',')
        .filter_map(|d| d.rsplit('=').next())
        .filter_map(|level| level.trim().parse::<LevelFilter>().ok())
        .max()
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LevelFilter,
    /// Prefix human lines with a timestamp.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Human,
            level: LevelFilter::INFO,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Resolve from the process environment, then apply CLI flags.
    pub fn from_env(cli_level: Option<LevelFilter>, cli_format: Option<LogFormat>) -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self::resolve(
            var("CT_LOG").as_deref(),
            var("RUST_LOG").as_deref(),
            var("CT_LOG_FORMAT").as_deref(),
        )
        .with_overrides(cli_level, cli_format)
    }

    fn resolve(ct_log: Option<&str>, rust_log: Option<&str>, ct_log_format: Option<&str>) -> Self {
        let env_level = ct_log
            .and_then(|v| v.trim().parse::<LevelFilter>().ok())
            .or_else(|| rust_log.and_then(most_verbose_directive));
        let env_format = ct_log_format.and_then(LogFormat::from_env_value);

        let defaults = Self::default();
        Self {
            level: env_level.unwrap_or(defaults.level),
            format: env_format.unwrap_or(defaults.format),
            ..defaults
        }
    }

    fn with_overrides(mut self, level: Option<LevelFilter>, format: Option<LogFormat>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    pub fn with_level(self, level: LevelFilter) -> Self {
        self.with_overrides(Some(level), None)
    }

    pub fn with_format(self, format: LogFormat) -> Self {
        self.with_overrides(None, Some(format))
    }

    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_flags() {
        assert_eq!(verbosity_filter(0, false), None);
        assert_eq!(verbosity_filter(1, false), Some(LevelFilter::DEBUG));
        assert_eq!(verbosity_filter(4, false), Some(LevelFilter::TRACE));
        assert_eq!(verbosity_filter(2, true), Some(LevelFilter::ERROR));
    }

    #[test]
    fn rust_log_directives_pick_most_verbose() {
        assert_eq!(
            most_verbose_directive("warn,ct_core=debug"),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(most_verbose_directive("ct_config=error"), Some(LevelFilter::ERROR));
        assert_eq!(most_verbose_directive("ct_core"), None);
    }

    #[test]
    fn ct_log_wins_over_rust_log() {
        let config = LogConfig::resolve(Some("warn"), Some("trace"), Some("json"));
        assert_eq!(config.level, LevelFilter::WARN);
        assert_eq!(config.format, LogFormat::Jsonl);

        let config = LogConfig::resolve(None, Some("ct_core=debug"), None);
        assert_eq!(config.level, LevelFilter::DEBUG);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn unparseable_env_falls_back_to_defaults() {
        let config = LogConfig::resolve(Some("loud"), None, Some("xml"));
        assert_eq!(config.level, LevelFilter::INFO);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn cli_flags_override_env() {
        let config = LogConfig::resolve(Some("error"), None, Some("human"))
            .with_overrides(Some(LevelFilter::TRACE), Some(LogFormat::Jsonl));
        assert_eq!(config.level, LevelFilter::TRACE);
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn builder() {
        let config = LogConfig::default()
            .with_format(LogFormat::Jsonl)
            .with_level(LevelFilter::OFF)
            .without_timestamps();
        assert_eq!(config.format, LogFormat::Jsonl);
        assert_eq!(config.level, LevelFilter::OFF);
        assert!(!config.timestamps);
    }
}
