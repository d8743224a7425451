//! Unified error types for the whole application.
//!
//! Repository failures surface as typed variants so the Discord layer can
//! decide what (if anything) to tell the user. Raw store errors are split by
//! `From<DbErr>` into transient failures (safe for the caller to retry),
//! constraint violations (a caller bug, never retryable), and everything else.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Unified application error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration (settings file, bad threshold, etc.)
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what was wrong
        message: String,
    },

    /// The `(message_id, starrer_id)` pair already exists.
    /// Callers treat this as a no-op, not a user-facing failure.
    #[error("User {starrer_id} has already starred message {message_id}")]
    DuplicateStar {
        /// Source message id
        message_id: i64,
        /// User who tried to star it again
        starrer_id: i64,
    },

    /// A tag with this name already exists in the guild.
    #[error("Tag '{name}' already exists in guild {guild_id}")]
    DuplicateTag {
        /// Guild the tag was created in
        guild_id: i64,
        /// The conflicting tag name
        name: String,
    },

    /// The requested row does not exist (or is no longer eligible).
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// The requester is not allowed to perform this operation.
    #[error("User {user_id} is not allowed to {action}")]
    Forbidden {
        /// User who attempted the operation
        user_id: i64,
        /// What they attempted
        action: &'static str,
    },

    /// Connectivity or pool-acquire failure - safe for the caller to retry.
    #[error("Transient store error: {0}")]
    TransientStore(#[source] DbErr),

    /// A schema-level invariant was broken. Indicates a caller bug; not retryable.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(#[source] DbErr),

    /// Any other database error.
    #[error("Database error: {0}")]
    Database(#[source] DbErr),

    /// I/O error (settings file reads, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl From<DbErr> for Error {
    fn from(value: DbErr) -> Self {
        match &value {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::TransientStore(value),
            _ => match value.sql_err() {
                Some(
                    SqlErr::UniqueConstraintViolation(_) | SqlErr::ForeignKeyConstraintViolation(_),
                ) => Self::ConstraintViolation(value),
                _ => Self::Database(value),
            },
        }
    }
}

/// Returns true when the error is a unique-constraint violation.
///
/// Repositories use this to turn the store's arbitration of an insert race
/// into the typed [`Error::DuplicateStar`]/[`Error::DuplicateTag`] variants
/// before the generic [`From<DbErr>`] classification applies.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
