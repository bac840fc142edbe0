//! Unified error hierarchy for periodrs
//!
//! The analytics and prediction paths never fail; these errors cover the
//! fallible plumbing around them (date parsing, validated record
//! construction, cache fingerprinting, configuration).

use thiserror::Error;

use crate::validation::ValidationIssue;

/// Top-level error type for all periodrs operations
#[derive(Debug, Error)]
pub enum PeriodRsError {
    /// Date string missing, malformed or out of range
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// Record failed structural/range validation
    #[error("Validation failed: {}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// Serialization errors (fingerprinting, JSON interchange)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for periodrs operations
pub type Result<T> = std::result::Result<T, PeriodRsError>;

impl PeriodRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PeriodRsError::InvalidDate { .. } => ErrorSeverity::Warning,
            PeriodRsError::Validation(_) => ErrorSeverity::Warning,
            PeriodRsError::Configuration(_) => ErrorSeverity::Error,
            PeriodRsError::Serialization(_) => ErrorSeverity::Error,
            PeriodRsError::Io(_) => ErrorSeverity::Error,
            PeriodRsError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PeriodRsError::InvalidDate { value, .. } => {
                format!("'{}' is not a valid date. Please use the YYYY-MM-DD format.", value)
            }
            PeriodRsError::Validation(issues) if issues.len() == 1 => issues[0].to_string(),
            PeriodRsError::Validation(issues) => {
                format!("The record has {} problems: {}", issues.len(), format_issues(issues))
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
