//! Token generation for scheduling links.

use uuid::Uuid;

/// Produces random opaque tokens for new links.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// UUID v4 tokens in their 32 character lowercase hex form.
///
/// The fixed width keeps tokens URL-safe and makes collisions negligible;
/// the registry still retries if the store reports one.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokenGenerator;

impl TokenGenerator for UuidTokenGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
