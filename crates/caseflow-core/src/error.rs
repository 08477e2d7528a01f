//! Error types for the caseflow library.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use thiserror::Error;

use crate::models::{CaseId, StepId};

/// Comprehensive error type for store and engine operations.
#[derive(Error, Debug)]
pub enum CaseflowError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Case not found for the given ID
    #[error("Case {id} not found")]
    CaseNotFound { id: CaseId },
    /// Step not found within the given case
    #[error("Step '{step_id}' not found in case {case_id}")]
    StepNotFound { case_id: CaseId, step_id: StepId },
    /// Mutation attempted on a closed case
    #[error("Case {id} is closed")]
    CaseClosed { id: CaseId },
    /// Move attempted on a case without a current step
    #[error("Case {id} has no current step")]
    NoCurrentStep { id: CaseId },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    /// Failure reported by a remote step store
    #[error("Transport error: {message}")]
    Transport { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> CaseflowError {
        CaseflowError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> CaseflowError {
        CaseflowError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl CaseflowError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a transport error from any displayable cause.
    pub fn transport(message: impl fmt::Display) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| CaseflowError::database(message).with_source(e))
    }
}

/// Extension trait for turning blocking-task join failures into
/// configuration errors.
pub trait JoinResultExt<T> {
    /// Flatten a `spawn_blocking` join result.
    fn join_context(self) -> Result<T>;
}

impl<T> JoinResultExt<T> for std::result::Result<Result<T>, tokio::task::JoinError> {
    fn join_context(self) -> Result<T> {
        self.map_err(|e| CaseflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

/// Local, pre-submission validation failures keyed by field id.
///
/// These never reach the network; callers render them next to the offending
/// field.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub BTreeMap<String, String>);

impl ValidationErrors {
    /// Create an empty set of validation errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field, replacing any earlier message.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Builder-style variant of [`ValidationErrors::add`].
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Convert into a `Result`, `Ok(())` when no field failed.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Result type alias for caseflow operations
pub type Result<T> = std::result::Result<T, CaseflowError>;
