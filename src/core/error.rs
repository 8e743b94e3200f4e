use thiserror::Error;

/// Centralized error types for the application
///
/// Ledger and command code return this enum; the Telegram layer turns it into a
/// reply with [`crate::commands::CommandHandler::error_reply`] so no error ever
/// reaches the dispatcher.
///
/// # Example
///
/// ```no_run
/// use expensebot::core::error::{AppError, ErrorKind};
///
/// let err = AppError::NotFound("Transaction #5 not found".to_string());
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad user input; the user is told why and asked again
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested row does not exist or belongs to someone else
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Schema migration errors
    #[error("Migration error: {0}")]
    Migration(String),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification used to pick a reply and a log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Storage(_) | AppError::Pool(_) | AppError::Migration(_) | AppError::Io(_) => ErrorKind::Storage,
            AppError::Telegram(_) | AppError::Config(_) => ErrorKind::Internal,
        }
    }

    /// Whether the failure should be surfaced to the operator
    pub fn is_storage(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}

impl From<refinery::Error> for AppError {
    fn from(err: refinery::Error) -> Self {
        AppError::Migration(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
