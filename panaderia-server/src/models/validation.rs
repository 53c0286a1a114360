//! Validation error types

use std::fmt;

use serde::Serialize;

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field is missing (or null)
    Required { field: &'static str },

    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., sku)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// JSON value has the wrong type
    InvalidType { field: &'static str, expected: &'static str },

    /// Numeric value outside the allowed range
    OutOfRange { field: &'static str, reason: &'static str },

    /// Request body could not be read as a JSON object
    InvalidBody { reason: String },

    /// Query string could not be parsed
    InvalidQuery { reason: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidVariant { field, .. }
            | Self::InvalidType { field, .. }
            | Self::OutOfRange { field, .. } => field,
            Self::InvalidBody { .. } => "body",
            Self::InvalidQuery { .. } => "query",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::InvalidType { field, expected } => {
                write!(f, "{} must be {}", field, expected)
            }
            Self::OutOfRange { field, reason } => write!(f, "{} {}", field, reason),
            Self::InvalidBody { reason } => write!(f, "invalid request body: {}", reason),
            Self::InvalidQuery { reason } => write!(f, "invalid query string: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// One entry of a validation error response body
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Every constraint violated by one request.
///
/// Never empty: constructed from at least one [`ValidationError`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Collect errors; returns `None` when there are none.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    #[cfg(test)]
    pub(crate) fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Check whether a given field was reported.
    #[cfg(test)]
    pub(crate) fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    pub fn violations(&self) -> Vec<FieldViolation> {
        self.0
            .iter()
            .map(|e| FieldViolation {
                field: e.field(),
                message: e.to_string(),
            })
            .collect()
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(e: ValidationError) -> Self {
        Self(vec![e])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
