//! Core error types for the Ledgerline application.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use serde::Serialize;
use thiserror::Error;

use crate::installments::InstallmentError;
use crate::recurring::RecurringError;
use crate::schedule::ScheduleError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the scheduling engine.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Schedule calculation failed: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("{0}")]
    Installment(#[from] InstallmentError),

    #[error("{0}")]
    Recurring(#[from] RecurringError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification used by callers to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad shape or range on input.
    Validation,
    /// Unknown id, or an id owned by someone else.
    NotFound,
    /// The requested transition is not allowed from the current state.
    StateConflict,
    /// A concurrent writer changed the record; retrying may succeed.
    Concurrency,
    /// Storage failure or anything unexpected.
    Persistence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::Schedule(_) => ErrorKind::Validation,
            Error::Database(DatabaseError::NotFound(_)) => ErrorKind::NotFound,
            Error::Database(_) | Error::Unexpected(_) => ErrorKind::Persistence,
            Error::Installment(e) => e.kind(),
            Error::Recurring(e) => e.kind(),
        }
    }

    /// Field-level details for validation failures; empty for other kinds.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            Error::Validation(ValidationError::Fields(fields)) => fields.clone(),
            Error::Validation(ValidationError::MissingField(field)) => {
                vec![FieldError::new(field, self.to_string())]
            }
            Error::Installment(e) => e
                .field()
                .map(|f| FieldError::new(f, e.to_string()))
                .into_iter()
                .collect(),
            Error::Recurring(e) => e
                .field()
                .map(|f| FieldError::new(f, e.to_string()))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// A single invalid request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("{} invalid field(s): {}", .0.len(), join_fields(.0))]
    Fields(Vec<FieldError>),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
