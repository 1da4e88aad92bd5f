// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process serialization keyed by slot.
//!
//! Two admissions for the same `(tenant, slot)` must not interleave their
//! count and insert. Admissions for different slots never wait on each other.
//! The registry only tracks which keys are held; waiters park on a shared
//! condition variable and re-check their own key when woken.

use shift_alloc_domain::{SlotId, TenantId};
use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};
use tracing::debug;

type SlotKey = (TenantId, SlotId);

/// Registry of slot keys currently held.
#[derive(Debug, Default)]
pub struct SlotLockRegistry {
    held: Mutex<HashSet<SlotKey>>,
    released: Condvar,
}

impl SlotLockRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the slot is free, then claims it.
    ///
    /// The set is only mutated through short critical sections that cannot
    /// panic, so a poisoned mutex still holds a consistent set.
    pub fn acquire(&self, tenant_id: TenantId, slot_id: SlotId) -> SlotGuard<'_> {
        let key: SlotKey = (tenant_id, slot_id);
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        while held.contains(&key) {
            debug!(%tenant_id, %slot_id, "Waiting for slot lock");
            held = self
                .released
                .wait(held)
                .unwrap_or_else(PoisonError::into_inner);
        }
        held.insert(key);
        drop(held);

        SlotGuard {
            registry: self,
            key,
        }
    }

    /// Number of slots currently held.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, key: &SlotKey) {
        let mut held = self.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(key);
        drop(held);
        self.released.notify_all();
    }
}

/// Holds a slot until dropped.
#[derive(Debug)]
pub struct SlotGuard<'a> {
    registry: &'a SlotLockRegistry,
    key: SlotKey,
}

impl SlotGuard<'_> {
    #[must_use]
    pub const fn slot_id(&self) -> SlotId {
        self.key.1
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}
