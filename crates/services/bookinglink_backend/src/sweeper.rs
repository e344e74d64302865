// --- File: crates/services/bookinglink_backend/src/sweeper.rs ---
//! Periodic removal of long-expired link records.

use std::sync::Arc;
use std::time::Duration;

use bookinglink_common::log_error;
use bookinglink_links::{LinkError, LinkRegistry};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Runs one purge pass and logs what it removed.
pub async fn sweep_once(registry: &LinkRegistry) -> Result<usize, LinkError> {
    let removed = registry.purge_expired().await?;
    if removed > 0 {
        info!(removed, "expiry sweep removed links");
    } else {
        debug!("expiry sweep found nothing to remove");
    }
    Ok(removed)
}

/// Starts the background sweeper. Returns `None` when `interval_secs` is 0.
pub fn spawn_sweeper(registry: Arc<LinkRegistry>, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("expiry sweeper disabled");
        return None;
    }

    let period = Duration::from_secs(interval_secs);
    info!(interval_secs, "starting expiry sweeper");
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately; nothing can have expired yet
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = sweep_once(&registry).await {
                log_error(e, "expiry sweep failed");
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookinglink_config::LinksConfig;
    use chrono::Utc;

    fn registry() -> Arc<LinkRegistry> {
        Arc::new(LinkRegistry::in_memory(&LinksConfig::default()))
    }

    #[tokio::test]
    async fn test_sweep_once_removes_links_past_retention() {
        let registry = registry();
        let long_ago = Utc::now() - chrono::Duration::hours(72);
        let (stale, _) = registry.get_or_create_at("alice", long_ago).await.unwrap();
        let (fresh, _) = registry.get_or_create("bob").await.unwrap();

        assert_eq!(sweep_once(&registry).await.unwrap(), 1);
        assert!(registry.find_by_token(&stale.token).await.unwrap().is_none());
        assert!(registry.find_by_token(&fresh.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_interval_disables_sweeper() {
        assert!(spawn_sweeper(registry(), 0).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_runs_on_interval() {
        let registry = registry();
        let long_ago = Utc::now() - chrono::Duration::hours(72);
        registry.get_or_create_at("alice", long_ago).await.unwrap();

        let handle = spawn_sweeper(registry.clone(), 60).unwrap();
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert_eq!(registry.stored_links().await.unwrap(), 0);
        handle.abort();
    }
}
