//! Run settings (settings.json).

use serde::{Deserialize, Serialize};

/// Where the response symbol sits relative to a matched input window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseAlignment {
    /// Response recorded at the same position as the window's last symbol.
    SamePosition,
    /// Response recorded one position after the window (default).
    #[default]
    NextPosition,
}

impl ResponseAlignment {
    /// Offset from an occurrence position to its response position.
    pub fn offset(self) -> usize {
        match self {
            ResponseAlignment::SamePosition => 0,
            ResponseAlignment::NextPosition => 1,
        }
    }
}

impl std::str::FromStr for ResponseAlignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "same" | "same_position" => Ok(ResponseAlignment::SamePosition),
            "next" | "next_position" => Ok(ResponseAlignment::NextPosition),
            _ => Err(format!("unknown response alignment: {}", s)),
        }
    }
}

impl std::fmt::Display for ResponseAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseAlignment::SamePosition => write!(f, "same_position"),
            ResponseAlignment::NextPosition => write!(f, "next_position"),
        }
    }
}

/// Estimation and likelihood settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Length of generated sequences.
    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,

    /// RNG seed for generation (random when absent).
    #[serde(default)]
    pub seed: Option<u64>,

    /// Upper bound on past-table cells summed over every depth; a depth `k`
    /// table over `m` symbols costs `m^k * (m + 1)`.
    #[serde(default = "default_max_table_entries")]
    pub max_table_entries: usize,

    /// Alignment of responses against matched input windows.
    #[serde(default)]
    pub response_alignment: ResponseAlignment,

    /// Keep every n-th entropy value in rendered reports.
    #[serde(default = "default_trajectory_stride")]
    pub trajectory_stride: usize,
}

fn default_sequence_length() -> usize {
    1_000_000
}

fn default_max_table_entries() -> usize {
    1 << 25
}

fn default_trajectory_stride() -> usize {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sequence_length: default_sequence_length(),
            seed: None,
            max_table_entries: default_max_table_entries(),
            response_alignment: ResponseAlignment::default(),
            trajectory_stride: default_trajectory_stride(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.sequence_length, 1_000_000);
        assert_eq!(s.max_table_entries, 33_554_432);
        assert_eq!(s.response_alignment, ResponseAlignment::NextPosition);
        assert_eq!(s.trajectory_stride, 1);
        assert!(s.seed.is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "seed": 7, "response_alignment": "same_position" }"#).unwrap();
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.response_alignment, ResponseAlignment::SamePosition);
        assert_eq!(s.sequence_length, 1_000_000);
    }

    #[test]
    fn alignment_parse_and_offset() {
        assert_eq!("next".parse::<ResponseAlignment>().unwrap().offset(), 1);
        assert_eq!("same".parse::<ResponseAlignment>().unwrap().offset(), 0);
        assert!("later".parse::<ResponseAlignment>().is_err());
        assert_eq!(ResponseAlignment::NextPosition.to_string(), "next_position");
    }
}
