//! Errors shared by every ct-* crate.
//!
//! Each variant has a stable numeric code (the tens digit is the category),
//! a short headline and a remediation hint. On the CLI the same error is
//! printed either for people:
//!
//! ```text
//! error[30]: Resource Exhausted
//!   past tables up to depth 40 over 4 symbols exceed the budget of 33554432 cells
//!   hint: Lower the tree height or raise max_table_entries in settings.json.
//! ```
//!
//! or as a [`StructuredError`] for tools:
//!
//! ```json
//! { "code": 30, "category": "resource", "message": "...",
//!   "remediation": "...", "context": { "depth": 40, "alphabet_size": 4, "limit": 33554432 } }
//! ```
//!
//! A likelihood of `-inf` for data the tree cannot explain and an all-zero
//! transition row for a never-observed past are results, not errors.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse grouping of error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Settings and model files that could not be loaded.
    Config,
    /// Trees, alphabets and transition tables.
    Model,
    /// Input sequences.
    Sequence,
    /// Table budgets.
    Resource,
    Io,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Config => "config",
            ErrorCategory::Model => "model",
            ErrorCategory::Sequence => "sequence",
            ErrorCategory::Resource => "resource",
            ErrorCategory::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum Error {
    // 1x: configuration and model
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("context tree is incomplete: past [{past}] has no matching context")]
    IncompleteTree { past: String },

    // 2x: sequences
    #[error("unknown symbol {symbol:?} (not in alphabet)")]
    UnknownSymbol { symbol: String },

    #[error("symbol index {index} out of range (alphabet size is {alphabet_size})")]
    SymbolOutOfRange { index: usize, alphabet_size: usize },

    #[error("input and response lengths differ: {input} vs {response}")]
    LengthMismatch { input: usize, response: usize },

    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    // 3x: resources
    #[error(
        "past tables up to depth {depth} over {alphabet_size} symbols exceed the budget of {limit} cells"
    )]
    ResourceExhausted {
        depth: usize,
        alphabet_size: usize,
        limit: usize,
    },

    // 6x: I/O and serialization
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable numeric code.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidModel(_) => 11,
            Error::InvalidAlphabet(_) => 12,
            Error::IncompleteTree { .. } => 13,
            Error::UnknownSymbol { .. } => 20,
            Error::SymbolOutOfRange { .. } => 21,
            Error::LengthMismatch { .. } => 22,
            Error::InvalidSequence(_) => 23,
            Error::ResourceExhausted { .. } => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            10 => ErrorCategory::Config,
            11..=19 => ErrorCategory::Model,
            20..=29 => ErrorCategory::Sequence,
            30..=39 => ErrorCategory::Resource,
            _ => ErrorCategory::Io,
        }
    }

    /// What to change so the command succeeds.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Check the settings file syntax, or run 'ct-core check --model <file>'."
            }
            Error::InvalidModel(_) => {
                "Fix the model file: contexts must be suffix-free and every transition row must sum to 1."
            }
            Error::InvalidAlphabet(_) => "List each alphabet symbol exactly once.",
            Error::IncompleteTree { .. } => {
                "Add contexts so that every past of maximal length ends with exactly one context."
            }
            Error::UnknownSymbol { .. } => {
                "Sequence files must only contain symbols declared in the model alphabet."
            }
            Error::SymbolOutOfRange { .. } => {
                "Encode symbols through the model alphabet before feeding them to the estimator."
            }
            Error::LengthMismatch { .. } => "Input and response sequences must be aligned one to one.",
            Error::InvalidSequence(_) => {
                "Provide a non-empty sequence at least as long as the tree height."
            }
            Error::ResourceExhausted { .. } => {
                "Lower the tree height or raise max_table_entries in settings.json."
            }
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON. Check syntax with 'jq . <file>'.",
        }
    }

    /// Title-case name of the failure.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidModel(_) => "Invalid Model",
            Error::InvalidAlphabet(_) => "Invalid Alphabet",
            Error::IncompleteTree { .. } => "Incomplete Context Tree",
            Error::UnknownSymbol { .. } => "Unknown Symbol",
            Error::SymbolOutOfRange { .. } => "Symbol Out Of Range",
            Error::LengthMismatch { .. } => "Sequence Length Mismatch",
            Error::InvalidSequence(_) => "Invalid Sequence",
            Error::ResourceExhausted { .. } => "Resource Exhausted",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }

    /// Machine-readable fields of the variant, empty for message-only ones.
    pub fn context(&self) -> Map<String, Value> {
        let value = match self {
            Error::IncompleteTree { past } => json!({ "past": past }),
            Error::UnknownSymbol { symbol } => json!({ "symbol": symbol }),
            Error::SymbolOutOfRange {
                index,
                alphabet_size,
            } => json!({ "index": index, "alphabet_size": alphabet_size }),
            Error::LengthMismatch { input, response } => {
                json!({ "input_len": input, "response_len": response })
            }
            Error::ResourceExhausted {
                depth,
                alphabet_size,
                limit,
            } => json!({ "depth": depth, "alphabet_size": alphabet_size, "limit": limit }),
            _ => return Map::new(),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Serializable form of an [`Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            remediation: err.remediation().to_string(),
            context: err.context(),
        }
    }
}

impl StructuredError {
    /// Compact JSON; never fails.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(_) => json!({ "code": self.code, "message": self.message }).to_string(),
        }
    }
}

/// Render `err` for stderr, with ANSI colour when `use_color` is set.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let paint = |code: &str, text: String| {
        if use_color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text
        }
    };
    format!(
        "{}\n  {}\n  {} {}",
        paint("1;31", format!("error[{}]: {}", err.code(), err.headline())),
        err,
        paint("36", "hint:".to_string()),
        err.remediation()
    )
}
