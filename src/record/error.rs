//! Validation error types

use thiserror::Error;

use crate::form::Field;

/// Why a single field was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("{field} is required")]
    Missing { field: Field },

    #[error("{field} must be a whole number, got {value:?}")]
    NotInteger { field: Field, value: String },

    #[error("{field} must be a number, got {value:?}")]
    NotNumber { field: Field, value: String },

    #[error("{field} must be 0 or more, got {value}")]
    Negative { field: Field, value: i64 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: Field,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a date in YYYY-MM-DD form, got {value:?}")]
    NotDate { field: Field, value: String },

    #[error("{field} cannot be in the future ({value})")]
    FutureDate { field: Field, value: String },
}

impl FieldError {
    /// The field this error refers to
    pub fn field(&self) -> Field {
        match self {
            FieldError::Missing { field }
            | FieldError::NotInteger { field, .. }
            | FieldError::NotNumber { field, .. }
            | FieldError::Negative { field, .. }
            | FieldError::OutOfRange { field, .. }
            | FieldError::NotDate { field, .. }
            | FieldError::FutureDate { field, .. } => *field,
        }
    }
}

/// Every field error found in one form, in canonical field order
#[derive(Error, Debug, Clone, PartialEq, Default)]
#[error("Invalid input: {}", self.joined())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Error for a specific field, if it failed
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field() == field)
    }

    fn joined(&self) -> String {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        messages.join("; ")
    }
}
