//! Structured, multi-error validation results.
//!
//! Validation never fails fast: every check runs and every violation is
//! collected, so a caller can present all problems in one round trip.

use serde::{Deserialize, Serialize};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// The offending field, e.g. `"sale_number"` or `"items[0].quantity"`.
    pub field: String,

    /// Human-readable description of the problem.
    pub message: String,
}

impl ValidationErrorDetail {
    /// Creates a new error detail.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a validation pass: valid when no errors were collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationErrorDetail>,
}

impl ValidationResult {
    /// Creates an empty (valid) result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no errors were collected.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the collected errors in the order they were found.
    pub fn errors(&self) -> &[ValidationErrorDetail] {
        &self.errors
    }

    /// Returns true if any error was recorded against `field`.
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Records an error.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationErrorDetail::new(field, message));
    }

    /// Records an error unless `condition` holds.
    pub fn ensure(&mut self, condition: bool, field: &str, message: &str) {
        if !condition {
            self.push(field, message);
        }
    }

    /// Records an error if `value` is empty or whitespace only.
    pub fn require(&mut self, field: &str, value: &str, message: &str) {
        self.ensure(!value.trim().is_empty(), field, message);
    }

    /// Records an error if `value` is longer than `max` characters.
    pub fn max_length(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(field, format!("Must not exceed {max} characters"));
        }
    }

    /// Appends all errors of `other`, prefixing each field with `prefix.`.
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationResult) {
        self.errors
            .extend(other.errors.into_iter().map(|e| ValidationErrorDetail {
                field: format!("{prefix}.{}", e.field),
                message: e.message,
            }));
    }

    /// Appends all errors of `other` unchanged.
    pub fn extend(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// Converts into `Ok(())` when valid, or `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationResult> {
        if self.is_valid() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "valid");
        }
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}
