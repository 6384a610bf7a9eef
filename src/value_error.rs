//! Errors in single values of a plants.in file
use std::fmt::Display;
use pest::RuleType;

/// Type alias for a `Result` with [`VError`] as the error type.
pub type VResult<T> = Result<T, VError>;


/// An error converting one whitespace-separated token into a typed value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VError {
    /// Indicates that the token does not have the syntax of the requested type.
    ParsingError{ s: String, t: &'static str, reason: String },

    /// Indicates that the token has valid syntax but does not fit the target type
    /// (e.g. a negative number for an unsigned field or an overflowing integer).
    ConversionError{ s: String, t: &'static str, reason: String },
}

impl Display for VError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VError::ParsingError { s, t, reason } => {
                write!(f, "Could not parse '{s}' as a {t}: {reason}")
            },
            VError::ConversionError { s, t, reason } => {
                write!(f, "Could not convert '{s}' to a {t}: {reason}")
            }
        }
    }
}

impl std::error::Error for VError {}

impl VError {
    pub fn from_pest<R: RuleType>(e: pest::error::Error<R>, s: &str, t: &'static str) -> Self {
        Self::ParsingError { s: s.to_owned(), t, reason: e.to_string() }
    }

    /// The offending token
    pub fn token(&self) -> &str {
        match self {
            VError::ParsingError { s, .. } => s,
            VError::ConversionError { s, .. } => s,
        }
    }
}
