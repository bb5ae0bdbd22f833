//! Structured logging on stderr.
//!
//! stdout carries command payloads only (reports and generated sequences), so
//! every subscriber installed here writes to stderr, either as readable lines
//! or as JSON lines for pipelines.

pub mod config;

pub use config::{verbosity_filter, LogConfig, LogFormat};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Stage of a run, attached to log events as the `stage` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Sequence,
    Estimate,
    Likelihood,
    Report,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Sequence => "sequence",
            Stage::Estimate => "estimate",
            Stage::Likelihood => "likelihood",
            Stage::Report => "report",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for the ct crates at `config.level`, unless `RUST_LOG` is set, in
/// which case it is used as given.
fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.level.to_string().to_ascii_lowercase();
        EnvFilter::new(format!("ct_core={level},ct_config={level}"))
    })
}

fn build_layer(config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync> {
    match config.format {
        LogFormat::Jsonl => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr);
            if config.timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    }
}

/// Install the global subscriber.
///
/// Fails only when a subscriber is already installed; callers that may run
/// more than once (tests, embedders) can ignore the error.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(build_layer(config))
        .with(build_filter(config))
        .try_init()
}

/// Identifier for one CLI invocation: `run-` and 12 hex digits.
pub fn generate_run_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("run-{}", &hex[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn run_ids_are_short_and_unique() {
        let a = generate_run_id();
        let b = generate_run_id();
        assert!(a.starts_with("run-"));
        assert_eq!(a.len(), 16);
        assert!(a[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Likelihood.to_string(), "likelihood");
        assert_eq!(Stage::Init.as_str(), "init");
    }

    #[test]
    fn second_init_reports_an_error() {
        let config = LogConfig::default().with_level(LevelFilter::OFF);
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
