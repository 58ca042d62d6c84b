//! Session store
//!
//! Keeps one serialized cart blob per session id. The in-memory store drops
//! entries that have been idle longer than the configured timeout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Option<String>;
    async fn set(&self, session_id: &str, value: String);
    async fn remove(&self, session_id: &str);
}

struct Entry {
    value: String,
    last_access: Instant,
}

/// DashMap-backed store with an idle timeout
pub struct MemorySessionStore {
    entries: DashMap<String, Entry>,
    idle_timeout: Duration,
}

impl MemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            idle_timeout,
        }
    }

    /// Drop every expired entry, returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let timeout = self.idle_timeout;
        self.entries
            .retain(|_, entry| entry.last_access.elapsed() < timeout);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Periodic purge loop, runs until `shutdown` fires
    pub async fn run_purge(self: Arc<Self>, interval: Duration, shutdown: CancellationToken) {
        tracing::info!(interval_secs = interval.as_secs(), "Session purge started");
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let purged = self.purge_expired();
                    if purged > 0 {
                        tracing::debug!(purged, remaining = self.len(), "Purged idle sessions");
                    }
                }
                _ = shutdown.cancelled() => {
                    tracing::info!("Session purge received shutdown signal");
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str) -> Option<String> {
        let mut entry = self.entries.get_mut(session_id)?;
        if entry.last_access.elapsed() >= self.idle_timeout {
            drop(entry);
            self.entries.remove(session_id);
            return None;
        }
        entry.last_access = Instant::now();
        Some(entry.value.clone())
    }

    async fn set(&self, session_id: &str, value: String) {
        self.entries.insert(
            session_id.to_string(),
            Entry {
                value,
                last_access: Instant::now(),
            },
        );
    }

    async fn remove(&self, session_id: &str) {
        self.entries.remove(session_id);
    }
}
