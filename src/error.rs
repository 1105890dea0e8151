//! Error taxonomy for portal operations
//!
//! Every failure resolves to "operation not applied": validation always runs
//! before anything is written back, so an `Err` never leaves a partial write.

use thiserror::Error;

/// Errors returned by the application context and admin transforms
#[derive(Debug, Error)]
pub enum LmsError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("this operation requires an administrator")]
    Forbidden,

    #[error("user '{0}' is protected and cannot be deleted")]
    ProtectedUser(String),

    #[error("required field '{0}' is blank")]
    MissingField(&'static str),

    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("module '{0}' is locked until the previous module's quiz is passed")]
    ModuleLocked(String),

    #[error("answer out of range: question {question}, option {option}")]
    InvalidAnswer { question: usize, option: usize },

    #[error("invalid question: {0}")]
    InvalidQuestion(&'static str),

    #[error("passing score must be between 0 and 100, got {0}")]
    InvalidPassingScore(u32),

    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl LmsError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        LmsError::NotFound { kind, id: id.into() }
    }
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, LmsError>;
