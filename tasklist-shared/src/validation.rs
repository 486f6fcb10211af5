/// Field-level validation messages
///
/// `validator` reports failures as a map keyed by field name. Forms need a
/// stable, flat list they can render next to each input, so every caller
/// funnels through [`field_errors`].

use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// A single failed rule on a single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flattens `validator` errors into field messages, sorted by field name
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut flat: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("The {} field is invalid.", field)),
            })
        })
        .collect();

    // HashMap order is arbitrary; keep output stable for rendering and tests
    flat.sort_by(|a, b| a.field.cmp(&b.field));
    flat
}
