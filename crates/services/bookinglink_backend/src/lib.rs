// --- File: crates/services/bookinglink_backend/src/lib.rs ---
pub mod app;
pub mod sweeper;
