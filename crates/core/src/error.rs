use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("Year out of range: {0}")]
    InvalidYear(i32),
    #[error("Invalid period '{0}', expected YYYY-MM")]
    InvalidPeriod(String),
    #[error("Rule pattern must not be empty")]
    EmptyPattern,
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
