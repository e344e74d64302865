use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bookinglink_common::{BookingLinkError, HttpStatusCode, IntoHttpResponse};
use thiserror::Error;

/// Link registry error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// No record carries the token
    #[error("Invalid link")]
    NotFound,

    /// The record exists but its expiration time has passed
    #[error("This link has expired")]
    Expired,

    /// The meeting for this link has already been booked
    #[error("This link has already been used")]
    AlreadyUsed,

    /// Freshly generated tokens kept colliding with stored ones
    #[error("Could not generate a unique token after {0} attempts")]
    TokenCollision(u32),

    /// Expiry arithmetic left the representable time range
    #[error("Link expiry is out of range")]
    ExpiryOutOfRange,

    /// The storage backend failed
    #[error("Link storage failure: {0}")]
    Storage(String),
}

impl From<LinkError> for BookingLinkError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::NotFound => BookingLinkError::NotFoundError(err.to_string()),
            LinkError::Expired => BookingLinkError::ValidationError(err.to_string()),
            LinkError::AlreadyUsed => BookingLinkError::GoneError(err.to_string()),
            LinkError::TokenCollision(_) | LinkError::ExpiryOutOfRange => {
                BookingLinkError::InternalError(err.to_string())
            }
            LinkError::Storage(msg) => BookingLinkError::StorageError(msg),
        }
    }
}

impl HttpStatusCode for LinkError {
    fn status_code(&self) -> u16 {
        match self {
            LinkError::NotFound => 404,
            LinkError::Expired => 400,
            LinkError::AlreadyUsed => 410,
            LinkError::TokenCollision(_) => 500,
            LinkError::ExpiryOutOfRange => 500,
            LinkError::Storage(_) => 500,
        }
    }
}

/// Link-state errors answer with their plain-text message, which is what the
/// person clicking the link sees. Infrastructure errors use the common JSON
/// error body.
impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        match self {
            LinkError::NotFound | LinkError::Expired | LinkError::AlreadyUsed => {
                let status = StatusCode::from_u16(self.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, self.to_string()).into_response()
            }
            LinkError::TokenCollision(_) | LinkError::ExpiryOutOfRange | LinkError::Storage(_) => {
                BookingLinkError::from(self).into_http_response()
            }
        }
    }
}
