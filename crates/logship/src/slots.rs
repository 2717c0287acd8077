// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Fixed set of shipment slots bounding how many deliveries run at once.
///
/// The pool starts full. A [`Slot`] returns to the pool when dropped, so a
/// slot can neither be released twice nor push the pool above its capacity.
#[derive(Debug, Clone)]
pub struct SlotPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Permission to run one delivery.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl SlotPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits up to `timeout` for a free slot.
    pub async fn acquire(&self, timeout: Duration) -> Option<Slot> {
        match tokio::time::timeout(timeout, Arc::clone(&self.semaphore).acquire_owned()).await {
            Ok(Ok(permit)) => Some(Slot { _permit: permit }),
            // closed semaphore or elapsed timeout
            Ok(Err(_)) | Err(_) => None,
        }
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held by running deliveries.
    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }

    /// Resolves once every slot is back in the pool.
    ///
    /// The semaphore is fair, so callers of [`SlotPool::acquire`] arriving
    /// later queue up behind this wait instead of starving it.
    pub async fn wait_idle(&self) {
        let all = u32::try_from(self.capacity).unwrap_or(u32::MAX);
        // the permits go straight back to the pool when dropped
        let _ = self.semaphore.acquire_many(all).await;
    }
}
