//! Client-side mirror of a membership set
//!
//! The mirror flips before the backend answers. Every flip hands out a
//! `PendingToggle` token that must come back through `confirm` or
//! `rollback`; tokens minted before the last `reset` are ignored.
//!
//! Shown membership is the last backend-confirmed membership flipped once
//! per toggle still in flight. A rollback only drops its own flip, so
//! overlapping toggles that all fail land back on confirmed state.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

/// Sync state of one key in the mirror
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Mirror agrees with the last backend answer
    #[default]
    Synced,
    /// A toggle is in flight
    Pending,
    /// The last toggle failed and was rolled back
    PendingWithError,
}

/// Handle for one optimistic flip
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending toggle must be confirmed or rolled back"]
pub struct PendingToggle<K> {
    key: K,
    was_active: bool,
    generation: u64,
}

impl<K> PendingToggle<K> {
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Membership before the flip
    #[inline]
    pub fn was_active(&self) -> bool {
        self.was_active
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Entry {
    in_flight: u32,
    failed: bool,
}

/// Membership set with per-key sync state
#[derive(Debug)]
pub struct MirrorSet<K> {
    /// Shown membership
    active: HashSet<K>,
    /// Membership as of the last backend answer
    confirmed: HashSet<K>,
    entries: HashMap<K, Entry>,
    generation: u64,
}

impl<K> Default for MirrorSet<K> {
    fn default() -> Self {
        Self {
            active: HashSet::new(),
            confirmed: HashSet::new(),
            entries: HashMap::new(),
            generation: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> MirrorSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror loaded from backend truth
    pub fn from_active(active: impl IntoIterator<Item = K>) -> Self {
        let confirmed: HashSet<K> = active.into_iter().collect();
        Self {
            active: confirmed.clone(),
            confirmed,
            ..Self::default()
        }
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.active.contains(key)
    }

    /// Membership according to the last backend answer, ignoring flips in flight
    #[inline]
    pub fn is_confirmed(&self, key: &K) -> bool {
        self.confirmed.contains(key)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self, key: &K) -> SyncState {
        match self.entries.get(key) {
            None => SyncState::Synced,
            Some(e) if e.failed => SyncState::PendingWithError,
            Some(_) => SyncState::Pending,
        }
    }

    /// Whether a token still belongs to this mirror's current generation
    #[inline]
    pub fn is_current(&self, token: &PendingToggle<K>) -> bool {
        token.generation == self.generation
    }

    /// Flip membership of `key` and mark it pending
    pub fn begin(&mut self, key: K) -> PendingToggle<K> {
        let was_active = self.contains(&key);

        let entry = self.entries.entry(key.clone()).or_default();
        entry.in_flight += 1;
        entry.failed = false;
        self.refresh(&key);

        PendingToggle {
            key,
            was_active,
            generation: self.generation,
        }
    }

    /// Apply the backend's answer; returns false for a stale token
    pub fn confirm(&mut self, token: PendingToggle<K>, is_active: bool) -> bool {
        if !self.is_current(&token) {
            return false;
        }
        if is_active {
            self.confirmed.insert(token.key.clone());
        } else {
            self.confirmed.remove(&token.key);
        }
        self.settle(&token.key, false);
        true
    }

    /// Drop this toggle's flip; returns false for a stale token
    pub fn rollback(&mut self, token: PendingToggle<K>) -> bool {
        if !self.is_current(&token) {
            return false;
        }
        self.settle(&token.key, true);
        true
    }

    /// Clear a shown error once the user has seen it
    pub fn acknowledge(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.failed = false;
            if entry.in_flight == 0 {
                self.entries.remove(key);
            }
        }
    }

    /// Replace the mirror with fresh backend truth; outstanding tokens go stale
    pub fn reset(&mut self, active: impl IntoIterator<Item = K>) {
        self.confirmed = active.into_iter().collect();
        self.active = self.confirmed.clone();
        self.entries.clear();
        self.generation += 1;
    }

    /// Stop accepting results of toggles already in flight and fall back to
    /// confirmed membership
    pub fn detach(&mut self) {
        self.active = self.confirmed.clone();
        self.entries.clear();
        self.generation += 1;
    }

    fn refresh(&mut self, key: &K) {
        let odd = self.entries.get(key).is_some_and(|e| e.in_flight % 2 == 1);
        if self.confirmed.contains(key) != odd {
            self.active.insert(key.clone());
        } else {
            self.active.remove(key);
        }
    }

    fn settle(&mut self, key: &K, failed: bool) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        entry.in_flight = entry.in_flight.saturating_sub(1);
        entry.failed |= failed;
        if entry.in_flight == 0 && !entry.failed {
            self.entries.remove(key);
        }
        self.refresh(key);
    }
}
