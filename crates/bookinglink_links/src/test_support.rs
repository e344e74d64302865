//! Shared fixtures for the in-crate tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bookinglink_config::{AppConfig, LinksConfig};
use chrono::{DateTime, TimeZone, Utc};

use crate::logic::{LinkRegistry, RegistrySettings};
use crate::store::InMemoryLinkStore;
use crate::token::TokenGenerator;

pub const BASE_URL: &str = "https://links.example.com";
pub const SCHEDULER_URL: &str = "https://meetings.example.com/team";

/// Hands out the scripted tokens first, then `tok1`, `tok2`, ...
#[derive(Default)]
pub struct ScriptedTokens {
    scripted: Mutex<VecDeque<String>>,
    counter: AtomicUsize,
}

impl ScriptedTokens {
    pub fn new(tokens: &[&str]) -> Self {
        Self {
            scripted: Mutex::new(tokens.iter().map(|t| t.to_string()).collect()),
            counter: AtomicUsize::new(0),
        }
    }
}

impl TokenGenerator for ScriptedTokens {
    fn generate(&self) -> String {
        if let Some(token) = self.scripted.lock().unwrap().pop_front() {
            return token;
        }
        format!("tok{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

pub fn links_config() -> LinksConfig {
    LinksConfig {
        public_base_url: BASE_URL.to_string(),
        scheduler_url: SCHEDULER_URL.to_string(),
        ..LinksConfig::default()
    }
}

pub fn app_config() -> Arc<AppConfig> {
    Arc::new(AppConfig {
        links: links_config(),
        ..AppConfig::default()
    })
}

pub fn registry_with(config: &LinksConfig, tokens: ScriptedTokens) -> LinkRegistry {
    LinkRegistry::new(
        Arc::new(InMemoryLinkStore::new()),
        Arc::new(tokens),
        RegistrySettings::from(config),
    )
}

pub fn registry(tokens: &[&str]) -> LinkRegistry {
    registry_with(&links_config(), ScriptedTokens::new(tokens))
}

/// Monday morning, a fixed point for deterministic expiry checks.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap()
}
