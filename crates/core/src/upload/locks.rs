//! Optional per-app mutual exclusion for uploads.
//!
//! Without it, two concurrent uploads to one app can both read the same old
//! blob path; the record ends up pointing at one new blob and the other leaks.
//! The locks only cover a single process. An app's entry is dropped once
//! its last holder or waiter is gone.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use folio_shared::types::AppId;

/// One async mutex per app.
#[derive(Debug, Default)]
pub struct OwnerLocks {
    locks: DashMap<AppId, Arc<Mutex<()>>>,
}

impl OwnerLocks {
    /// Create an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to an app.
    pub async fn acquire(&self, app_id: AppId) -> OwnerGuard<'_> {
        let lock = Arc::clone(self.locks.entry(app_id).or_default().value());
        let held = lock.lock_owned().await;
        OwnerGuard {
            locks: &self.locks,
            app_id,
            held: Some(held),
        }
    }

    /// Number of apps currently locked or awaited.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no app is locked or awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one app, released on drop.
#[derive(Debug)]
pub struct OwnerGuard<'a> {
    locks: &'a DashMap<AppId, Arc<Mutex<()>>>,
    app_id: AppId,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        drop(self.held.take());
        // The map's own reference is the last one when nobody else waits.
        self.locks
            .remove_if(&self.app_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
