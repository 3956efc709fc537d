//! Snapshot cache for record collections
//!
//! List screens work over the full collection. Each collection is held as an
//! immutable `Arc<Vec<T>>`; readers keep their snapshot for as long as they
//! need it and a reload swaps in a new one without touching the old.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shared::{Bayaran, FailRecord, Surat};
use tokio::sync::RwLock;

use crate::error::AppResult;

struct Entry<T> {
    records: Arc<Vec<T>>,
    loaded_at: Instant,
}

/// A time-bounded snapshot of one collection
pub struct SnapshotCache<T> {
    name: &'static str,
    ttl: Duration,
    entry: Arc<RwLock<Option<Entry<T>>>>,
}

impl<T> Clone for SnapshotCache<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            ttl: self.ttl,
            entry: Arc::clone(&self.entry),
        }
    }
}

impl<T> SnapshotCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entry: Arc::new(RwLock::new(None)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The cached snapshot if it is still fresh
    pub async fn fresh(&self) -> Option<Arc<Vec<T>>> {
        let guard = self.entry.read().await;
        guard
            .as_ref()
            .filter(|e| e.loaded_at.elapsed() < self.ttl)
            .map(|e| Arc::clone(&e.records))
    }

    /// Return the fresh snapshot or load a new one
    pub async fn get_or_load<F, Fut>(&self, load: F) -> AppResult<Arc<Vec<T>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Vec<T>>>,
    {
        if let Some(records) = self.fresh().await {
            return Ok(records);
        }

        let records = load().await?;
        Ok(self.store(records).await)
    }

    /// Replace the snapshot
    pub async fn store(&self, records: Vec<T>) -> Arc<Vec<T>> {
        let records = Arc::new(records);
        tracing::debug!(cache = self.name, count = records.len(), "snapshot stored");
        *self.entry.write().await = Some(Entry {
            records: Arc::clone(&records),
            loaded_at: Instant::now(),
        });
        records
    }

    /// Drop the snapshot so the next read reloads
    pub async fn invalidate(&self) {
        tracing::debug!(cache = self.name, "snapshot invalidated");
        *self.entry.write().await = None;
    }
}

/// One cache per record collection
#[derive(Clone)]
pub struct RecordCaches {
    pub surat: SnapshotCache<Surat>,
    pub bayaran: SnapshotCache<Bayaran>,
    pub fail: SnapshotCache<FailRecord>,
}

impl RecordCaches {
    pub fn new(ttl: Duration) -> Self {
        Self {
            surat: SnapshotCache::new("surat", ttl),
            bayaran: SnapshotCache::new("bayaran", ttl),
            fail: SnapshotCache::new("fail", ttl),
        }
    }
}
