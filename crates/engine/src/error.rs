//! The module contains the errors the engine can throw.
//!
//! Every variant maps to a stable error code from a closed taxonomy via
//! [`EngineError::code`]; the HTTP layer translates the code into a status
//! class and clients branch on it.
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("incomplete transaction header: {0}")]
    HeaderIncomplete(String),
    #[error("no correction rows supplied")]
    EmptyRows,
    #[error("unbalanced rows: {0}")]
    Unbalanced(String),
    #[error("invalid account: {0}")]
    InvalidAccount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("already corrected: {0}")]
    AlreadyCorrected(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Stable error code surfaced to API clients.
    ///
    /// Storage-integrity failures (unparsable ids, currencies or event
    /// payloads) are reported as persistence failures: the request was fine,
    /// the stored data was not.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::HeaderIncomplete(_) => "VALIDATION_HEADER_INCOMPLETE",
            Self::EmptyRows => "VALIDATION_EMPTY_ROWS",
            Self::Unbalanced(_) => "VALIDATION_UNBALANCED",
            Self::InvalidAccount(_) => "VALIDATION_INVALID_ACCOUNT",
            Self::KeyNotFound(_) => "NOT_FOUND",
            Self::AlreadyCorrected(_) => "CONFLICT_ALREADY_CORRECTED",
            Self::InvalidId(_)
            | Self::CurrencyMismatch(_)
            | Self::InvalidEvent(_)
            | Self::Database(_) => "PERSISTENCE_FAILURE",
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::HeaderIncomplete(a), Self::HeaderIncomplete(b)) => a == b,
            (Self::EmptyRows, Self::EmptyRows) => true,
            (Self::Unbalanced(a), Self::Unbalanced(b)) => a == b,
            (Self::InvalidAccount(a), Self::InvalidAccount(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::AlreadyCorrected(a), Self::AlreadyCorrected(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::InvalidEvent(a), Self::InvalidEvent(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
