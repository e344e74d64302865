// --- File: crates/bookinglink_links/src/lib.rs ---
// Declare modules within this crate
#[cfg(feature = "openapi")]
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod routes;
pub mod store;
#[cfg(test)]
mod test_support;
pub mod token;

// Re-export for main backend
pub use error::LinkError;
pub use handlers::LinksState;
pub use logic::{LinkRegistry, RegistrySettings};
pub use models::{LinkIssue, LinkRecord};
pub use routes::routes;
pub use store::{InMemoryLinkStore, LinkStore};
pub use token::{TokenGenerator, UuidTokenGenerator};
