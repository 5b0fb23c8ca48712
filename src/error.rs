/// Failures of the booking core. The message of every variant except
/// `Store` and `PasswordHash` is meant to be shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    CapacityExceeded(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(argon2::Error),
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Maps a foreign key violation to `NotFound` with the given message and
/// leaves every other database error as a store failure.
pub fn missing_reference(err: sqlx::Error, message: &str) -> BookingError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            BookingError::NotFound(message.to_string())
        }
        _ => BookingError::Store(err),
    }
}

/// Maps a unique constraint violation to `Conflict` with the given message.
pub fn duplicate_key(err: sqlx::Error, message: &str) -> BookingError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            BookingError::Conflict(message.to_string())
        }
        _ => BookingError::Store(err),
    }
}
