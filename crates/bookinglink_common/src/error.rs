use std::fmt;
use thiserror::Error;

/// The base error type for all booking link errors.
///
/// Each crate defines its own error enum and implements
/// `From<SpecificError> for BookingLinkError`.
#[derive(Error, Debug)]
pub enum BookingLinkError {
    /// A request payload could not be parsed
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error reported by the link storage backend
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The resource existed but is no longer available
    #[error("Gone: {0}")]
    GoneError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BookingLinkError {
    fn status_code(&self) -> u16 {
        match self {
            BookingLinkError::ParseError(_) => 400,
            BookingLinkError::ValidationError(_) => 400,
            BookingLinkError::StorageError(_) => 500,
            BookingLinkError::NotFoundError(_) => 404,
            BookingLinkError::GoneError(_) => 410,
            BookingLinkError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, BookingLinkError>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, BookingLinkError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| BookingLinkError::InternalError(format!("{}: {}", context, error)))
    }
}

impl From<serde_json::Error> for BookingLinkError {
    fn from(err: serde_json::Error) -> Self {
        BookingLinkError::ParseError(err.to_string())
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> BookingLinkError {
    BookingLinkError::InternalError(message.to_string())
}
