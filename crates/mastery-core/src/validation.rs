use thiserror::Error;

/// A value rejected at a type boundary.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Text outside the accepted syntax or vocabulary.
    #[error("invalid {field}: '{value}'")]
    PatternMismatch {
        /// What was being parsed.
        field: &'static str,
        /// The rejected text.
        value: String,
    },
    /// A number outside its allowed range.
    #[error("{field} {value} is outside the allowed range")]
    OutOfBounds {
        /// What was being checked.
        field: &'static str,
        /// The rejected number, formatted.
        value: String,
    },
}
