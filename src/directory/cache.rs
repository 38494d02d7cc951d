use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::directory::Directory;

/// How long a fetched directory stays fresh.
const TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Default)]
struct Slot {
    payload: Vec<u8>,
    valid_until: Option<Instant>,
}

impl Slot {
    fn fresh(&self, now: Instant) -> bool {
        self.valid_until.map_or(false, |until| until > now)
    }
}

/// Single-slot TTL cache in front of the directory fetch.
///
/// The mutex is held for the full duration of a miss, upstream call
/// included: concurrent readers of a stale slot block on the lock until the
/// one in-flight refresh completes, then read its result. The lock is the
/// whole de-duplication story. A failed refresh propagates to its caller and
/// leaves the previous entry (and its expiry) untouched, so the next request
/// retries.
pub struct DirectoryCache {
    source: Arc<dyn Directory>,
    slot: Mutex<Slot>,
}

impl DirectoryCache {
    #[must_use]
    pub fn new(source: Arc<dyn Directory>) -> Self {
        Self {
            source,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Serialized employee list, from cache or a fresh upstream fetch.
    ///
    /// Cancellation of the caller drops the future, aborting the upstream
    /// call and releasing the lock.
    ///
    /// # Errors
    /// Returns the upstream error verbatim when a refresh is needed and
    /// fails. No retries, no backoff.
    pub async fn get(&self) -> Result<Vec<u8>> {
        let mut slot = self.slot.lock().await;

        if !slot.fresh(Instant::now()) {
            debug!("directory cache stale, refreshing");
            let employees = self.source.employees().await?;
            slot.payload = serde_json::to_vec(&employees)?;
            // Expiry advances only after a successful refresh.
            slot.valid_until = Some(Instant::now() + TTL);
        }

        Ok(slot.payload.clone())
    }
}
