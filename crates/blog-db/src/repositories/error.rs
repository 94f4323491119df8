//! Error handling utilities for repositories

use blog_core::error::DomainError;
use blog_core::value_objects::Id;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique violation on the users table to the matching duplicate
/// error, keyed by constraint name. Any other failure falls back to a
/// database error. This is what resolves two concurrent registrations of
/// the same name into exactly one success.
pub fn map_user_unique_violation(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_username_key") => DomainError::UsernameAlreadyExists,
                Some("users_email_key") => DomainError::EmailAlreadyExists,
                _ => DomainError::DatabaseError(db_err.to_string()),
            };
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "user not found" error
pub fn user_not_found(id: Id) -> DomainError {
    DomainError::UserNotFound(id)
}

/// Create a "post not found" error
pub fn post_not_found(id: Id) -> DomainError {
    DomainError::PostNotFound(id)
}
