// --- File: crates/bookinglink_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP error mapping
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{internal_error, BookingLinkError, Context, HttpStatusCode};

pub use http::IntoHttpResponse;

pub use logging::{init as init_logging, log_error};
