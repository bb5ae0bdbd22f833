//! Configuration validation errors and semantic validation.

use crate::model::ModelSpec;
use crate::settings::Settings;
use std::collections::HashSet;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Tolerance for transition rows summing to 1.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a model file semantically.
pub fn validate_model_spec(model: &ModelSpec) -> ValidationResult<()> {
    if model.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: model.schema_version.clone(),
        });
    }

    if model.alphabet.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "alphabet".to_string(),
            message: "must contain at least one symbol".to_string(),
        });
    }
    let mut seen = HashSet::new();
    for symbol in &model.alphabet {
        if !seen.insert(symbol.as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "alphabet".to_string(),
                message: format!("duplicate symbol {:?}", symbol),
            });
        }
    }

    for (i, spec) in model.contexts.iter().enumerate() {
        let field = format!("contexts[{}]", i);
        for symbol in &spec.context {
            if !seen.contains(symbol.as_str()) {
                return Err(ValidationError::InvalidValue {
                    field,
                    message: format!("symbol {:?} is not in the alphabet", symbol),
                });
            }
        }
        validate_row(&format!("{}.transition", field), &spec.transition, model.alphabet.len())?;
    }

    validate_suffix_free(model)
}

/// Validate run settings.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.sequence_length == 0 {
        return Err(ValidationError::InvalidValue {
            field: "sequence_length".to_string(),
            message: "must be positive".to_string(),
        });
    }
    if settings.max_table_entries == 0 {
        return Err(ValidationError::InvalidValue {
            field: "max_table_entries".to_string(),
            message: "must be positive".to_string(),
        });
    }
    if settings.trajectory_stride == 0 {
        return Err(ValidationError::InvalidValue {
            field: "trajectory_stride".to_string(),
            message: "must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_row(field: &str, row: &[f64], alphabet_size: usize) -> ValidationResult<()> {
    if row.len() != alphabet_size {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("expected {} probabilities, got {}", alphabet_size, row.len()),
        });
    }
    for &p in row {
        if !p.is_finite() || p < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("probability {} must be finite and non-negative", p),
            });
        }
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("probabilities must sum to 1.0, got {}", sum),
        });
    }
    Ok(())
}

/// No context may be a suffix of another (this includes duplicates).
fn validate_suffix_free(model: &ModelSpec) -> ValidationResult<()> {
    let contexts = &model.contexts;
    if contexts.len() > 1 && contexts.iter().any(|c| c.context.is_empty()) {
        return Err(ValidationError::SemanticError(
            "the empty context must be the only context of a memoryless model".to_string(),
        ));
    }
    for (i, a) in contexts.iter().enumerate() {
        for (j, b) in contexts.iter().enumerate() {
            if i != j && b.context.ends_with(&a.context) {
                return Err(ValidationError::SemanticError(format!(
                    "context {} [{}] is a suffix of context {} [{}]",
                    i,
                    a.context.join(" "),
                    j,
                    b.context.join(" ")
                )));
            }
        }
    }
    Ok(())
}
