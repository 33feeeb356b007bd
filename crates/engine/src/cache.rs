// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-through cache of the full agent list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use fleet_core::{AgentRecord, Clock};
use parking_lot::RwLock;

struct Entry {
    agents: Vec<AgentRecord>,
    loaded_at: Instant,
}

/// Caches the result of a full store read for at most `ttl`.
///
/// Writers call [`AgentCache::invalidate`] after changing the store. A load
/// that raced with an invalidation is returned to its caller but not kept.
pub struct AgentCache<C: Clock> {
    entry: RwLock<Option<Entry>>,
    generation: AtomicU64,
    ttl: Duration,
    clock: C,
}

impl<C: Clock> AgentCache<C> {
    pub fn new(ttl: Duration, clock: C) -> Self {
        Self { entry: RwLock::new(None), generation: AtomicU64::new(0), ttl, clock }
    }

    /// Cached agents, or the result of `load` when the entry is missing
    /// or older than the TTL.
    pub fn get_or_load<E>(
        &self,
        load: impl FnOnce() -> Result<Vec<AgentRecord>, E>,
    ) -> Result<Vec<AgentRecord>, E> {
        if let Some(entry) = self.entry.read().as_ref() {
            if self.clock.now().saturating_duration_since(entry.loaded_at) < self.ttl {
                return Ok(entry.agents.clone());
            }
        }

        let generation = self.generation.load(Ordering::Acquire);
        let loaded_at = self.clock.now();
        let agents = load()?;

        let mut slot = self.entry.write();
        if self.generation.load(Ordering::Acquire) == generation {
            *slot = Some(Entry { agents: agents.clone(), loaded_at });
        }
        Ok(agents)
    }

    /// Drop the cached list; the next read goes to the store.
    pub fn invalidate(&self) {
        let mut slot = self.entry.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        *slot = None;
    }

    /// Number of invalidations since creation.
    pub fn invalidations(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
