//! Error types for segment assembly.
//!
//! Assembly distinguishes two kinds of trouble:
//!
//! - **Fatal** errors abort the whole attempt and nothing is persisted: no content at
//!   all, a fixed-form segment without a usable form, or a collaborator failure.
//! - **Degraded** conditions (an item whose strand is not configured, a field-test
//!   group that no longer fits the budget) are logged and skipped by the component
//!   that meets them. They never surface as an [`AssemblyError`].
//!
//! # Error Codes
//!
//! - E001-E009: content availability
//! - E010-E019: forms and cohorts
//! - E020-E029: configuration
//! - E030-E039: collaborators and I/O
//!
//! # Example
//!
//! ```rust
//! use exam_assembly::errors::{AssemblyError, ErrorCode};
//!
//! let err = AssemblyError::no_form("SEG-1", "ENU");
//! assert_eq!(err.code(), ErrorCode::NO_FORM);
//! assert!(!err.is_retryable());
//! ```

use serde::Serialize;
use thiserror::Error;

/// Structured error code for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Every segment resolved to zero items
    pub const NO_CONTENT: ErrorCode = ErrorCode("E001");
    /// Assessment missing from the content catalog
    pub const ASSESSMENT_NOT_FOUND: ErrorCode = ErrorCode("E002");

    /// No form for a fixed-form segment in the exam language
    pub const NO_FORM: ErrorCode = ErrorCode("E010");
    /// No form matching the cohort chosen by an earlier segment
    pub const NO_COHORT_FORM: ErrorCode = ErrorCode("E011");

    /// Invalid configuration value
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("E020");

    /// External collaborator failure
    pub const COLLABORATOR: ErrorCode = ErrorCode("E030");
    /// File system failure
    pub const IO: ErrorCode = ErrorCode("E031");
    /// JSON encoding or decoding failure
    pub const JSON: ErrorCode = ErrorCode("E032");

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Main error type for assembly operations
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("No content available for exam {exam_id}: every segment resolved to zero items")]
    NoContent { exam_id: String },

    #[error("Assessment {assessment_key} not found for client {client_name}")]
    AssessmentNotFound {
        client_name: String,
        assessment_key: String,
    },

    #[error("No form found for segment {segment_key} in language {language}")]
    NoFormFound {
        segment_key: String,
        language: String,
    },

    #[error("No form for segment {segment_key} in language {language} matches cohort {cohort}")]
    NoCohortForm {
        segment_key: String,
        language: String,
        cohort: String,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        field: Option<String>,
    },

    #[error("{service} failed: {message}")]
    Collaborator {
        service: &'static str,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AssemblyError {
    pub fn no_content(exam_id: impl Into<String>) -> Self {
        Self::NoContent {
            exam_id: exam_id.into(),
        }
    }

    pub fn no_form(segment_key: impl Into<String>, language: impl Into<String>) -> Self {
        Self::NoFormFound {
            segment_key: segment_key.into(),
            language: language.into(),
        }
    }

    pub fn no_cohort_form(
        segment_key: impl Into<String>,
        language: impl Into<String>,
        cohort: impl Into<String>,
    ) -> Self {
        Self::NoCohortForm {
            segment_key: segment_key.into(),
            language: language.into(),
            cohort: cohort.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    pub fn config_with_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn collaborator(service: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            service,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoContent { .. } => ErrorCode::NO_CONTENT,
            Self::AssessmentNotFound { .. } => ErrorCode::ASSESSMENT_NOT_FOUND,
            Self::NoFormFound { .. } => ErrorCode::NO_FORM,
            Self::NoCohortForm { .. } => ErrorCode::NO_COHORT_FORM,
            Self::Config { .. } => ErrorCode::CONFIG_INVALID,
            Self::Collaborator { .. } => ErrorCode::COLLABORATOR,
            Self::Io(_) => ErrorCode::IO,
            Self::Json(_) => ErrorCode::JSON,
        }
    }

    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NoContent { .. } | Self::AssessmentNotFound { .. } => "Content",
            Self::NoFormFound { .. } | Self::NoCohortForm { .. } => "Form",
            Self::Config { .. } => "Config",
            Self::Collaborator { .. } => "Collaborator",
            Self::Io(_) => "I/O",
            Self::Json(_) => "JSON",
        }
    }

    /// Check if this error might clear up when the surrounding service retries.
    ///
    /// Content and form errors are a property of the assessment configuration and
    /// repeat on every attempt. Collaborator and I/O failures may be transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Collaborator { .. } | Self::Io(_))
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, AssemblyError>;
