// libs/scheduling-cell/src/lock.rs
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::SchedulingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    Doctor(Uuid),
    Room(Uuid),
}

/// Per-doctor and per-room exclusion scopes for booking transactions.
///
/// Each key maps to its own mutex, so only bookings that could touch the
/// same doctor or room serialize; unrelated bookings proceed in parallel.
/// Keys are always taken doctor first, then room, which rules out wait
/// cycles between concurrent acquisitions.
pub struct SlotLockManager {
    locks: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
    wait_timeout: Duration,
}

impl SlotLockManager {
    pub fn new(wait_timeout: Duration) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            wait_timeout,
        }
    }

    /// Acquire the exclusion scope for one booking attempt. The scope is
    /// released when the returned guard drops, including on every error
    /// path. A key that cannot be locked within the configured wait yields
    /// `ContentionTimeout` and releases anything already held.
    pub async fn acquire(
        &self,
        doctor_id: Uuid,
        room_id: Option<Uuid>,
    ) -> Result<SlotLockGuard, SchedulingError> {
        let mut keys = vec![LockKey::Doctor(doctor_id)];
        if let Some(room_id) = room_id {
            keys.push(LockKey::Room(room_id));
        }

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            let lock = self.entry(key).await;
            match tokio::time::timeout(self.wait_timeout, lock.lock_owned()).await {
                Ok(guard) => guards.push(guard),
                Err(_) => {
                    warn!("Timed out waiting for scheduling lock {:?}", key);
                    return Err(SchedulingError::ContentionTimeout);
                }
            }
        }

        debug!("Scheduling locks acquired for doctor {}", doctor_id);
        Ok(SlotLockGuard { _guards: guards })
    }

    /// Number of keys currently tracked. Idle keys are evicted on the next
    /// acquisition, so this stays bounded by the keys actually in use.
    pub async fn tracked_keys(&self) -> usize {
        self.locks.lock().await.len()
    }

    async fn entry(&self, key: LockKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        // A strong count of 1 means no guard holds the key and no waiter is
        // queued on it, so the entry can go; it is recreated on demand.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Holds the acquired keys for the duration of one booking transaction.
#[derive(Debug)]
pub struct SlotLockGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}
