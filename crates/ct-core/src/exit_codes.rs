//! Process exit codes of the ct-core CLI.
//!
//! Scripts can branch on the code alone: `0` is success, `10..=19` means
//! the arguments or input files need fixing, `20..` is an internal or I/O
//! failure.

use ct_common::{Error, ErrorCategory};

/// Stable exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Clean = 0,

    /// Command line could not be parsed.
    ArgsError = 10,
    /// Settings or model file rejected.
    ConfigError = 11,
    /// Sequence file rejected: unknown symbols, empty, lengths differ.
    SequenceError = 12,
    /// A past table would exceed `max_table_entries`.
    ResourceError = 13,

    /// Serialization failure.
    InternalError = 20,
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Fixable by the caller (`10..=19`).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Not the caller's fault (`20..`).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Symbolic name used in JSON error output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::SequenceError => "ERR_SEQUENCE",
            ExitCode::ResourceError => "ERR_RESOURCE",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a library error. JSON failures are internal; the rest
    /// map by category.
    pub fn for_error(err: &Error) -> Self {
        match (err, err.category()) {
            (Error::Json(_), _) => ExitCode::InternalError,
            (_, ErrorCategory::Config | ErrorCategory::Model) => ExitCode::ConfigError,
            (_, ErrorCategory::Sequence) => ExitCode::SequenceError,
            (_, ErrorCategory::Resource) => ExitCode::ResourceError,
            (_, ErrorCategory::Io) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::ResourceError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert!(!ExitCode::ArgsError.is_internal_error());
    }

    #[test]
    fn maps_library_errors() {
        let unknown = Error::UnknownSymbol {
            symbol: "x".to_string(),
        };
        assert_eq!(ExitCode::for_error(&unknown), ExitCode::SequenceError);
        let exhausted = Error::ResourceExhausted {
            depth: 30,
            alphabet_size: 4,
            limit: 10,
        };
        assert_eq!(ExitCode::for_error(&exhausted), ExitCode::ResourceError);
        assert_eq!(
            ExitCode::for_error(&Error::IncompleteTree {
                past: "1 0".to_string()
            }),
            ExitCode::ConfigError
        );
        assert_eq!(ExitCode::ConfigError.to_string(), "ERR_CONFIG (11)");
    }
}
