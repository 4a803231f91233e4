//! Per-agent, time-decaying memory of past detections
//!
//! Each registered agent owns one `TargetMemoryStore`. Entries are upserted
//! on detection and only removed during scheduler passes, so a single
//! detection call never pays for a full retention sweep.

use ahash::AHashMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::{SimTime, TargetId};
use crate::perception::channel::DetectionChannel;

/// What one agent remembers about one target
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Channel of the most recent detection
    pub channel: DetectionChannel,
    /// How trustworthy the remembered information is (fixed per channel)
    pub reliability: f32,
    /// Last reported position of the target
    pub position: Vec3,
    /// When this entry was first created
    pub first_recorded: SimTime,
    /// When the target was last perceived (or reported lost)
    pub last_seen: SimTime,
}

/// Mapping from target identity to memory entry for a single agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetMemoryStore {
    entries: AHashMap<TargetId, MemoryEntry>,
}

impl TargetMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    /// Upsert an entry for a freshly detected target
    pub fn record_detection(
        &mut self,
        target: TargetId,
        channel: DetectionChannel,
        reliability: f32,
        position: Vec3,
        now: SimTime,
    ) {
        self.entries
            .entry(target)
            .and_modify(|entry| {
                entry.channel = channel;
                entry.reliability = reliability;
                entry.position = position;
                entry.last_seen = now;
            })
            .or_insert(MemoryEntry {
                channel,
                reliability,
                position,
                first_recorded: now,
                last_seen: now,
            });
    }

    /// Mark a target as lost without deleting the entry
    ///
    /// Keeps last-known-position queries answerable after contact ends.
    pub fn record_target_lost(&mut self, target: TargetId, now: SimTime) {
        if let Some(entry) = self.entries.get_mut(&target) {
            entry.last_seen = now;
        }
    }

    /// Remove entries whose last sighting fell outside the retention window
    ///
    /// Called from scheduler passes only.
    pub fn prune_expired(&mut self, now: SimTime, retention: SimTime) {
        self.entries.retain(|_, entry| now - entry.last_seen <= retention);
    }

    pub fn get(&self, target: TargetId) -> Option<&MemoryEntry> {
        self.entries.get(&target)
    }

    pub fn last_known_position(&self, target: TargetId) -> Option<Vec3> {
        self.entries.get(&target).map(|entry| entry.position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TargetId, &MemoryEntry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creates_then_refreshes() {
        let mut store = TargetMemoryStore::new();
        let target = TargetId::new();

        store.record_detection(
            target,
            DetectionChannel::Visual,
            0.9,
            Vec3::new(1.0, 0.0, 0.0),
            1.0,
        );
        assert_eq!(store.len(), 1);
        let entry = store.get(target).unwrap();
        assert_eq!(entry.first_recorded, 1.0);
        assert_eq!(entry.last_seen, 1.0);

        store.record_detection(
            target,
            DetectionChannel::Auditory,
            0.7,
            Vec3::new(2.0, 0.0, 0.0),
            5.0,
        );
        assert_eq!(store.len(), 1);
        let entry = store.get(target).unwrap();
        assert_eq!(entry.channel, DetectionChannel::Auditory);
        assert_eq!(entry.first_recorded, 1.0);
        assert_eq!(entry.last_seen, 5.0);
        assert_eq!(entry.position, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_target_lost_keeps_position() {
        let mut store = TargetMemoryStore::new();
        let target = TargetId::new();
        let pos = Vec3::new(3.0, 1.0, -2.0);

        store.record_detection(target, DetectionChannel::Visual, 0.9, pos, 0.0);
        store.record_target_lost(target, 4.0);

        assert_eq!(store.last_known_position(target), Some(pos));
        assert_eq!(store.get(target).unwrap().last_seen, 4.0);
    }

    #[test]
    fn test_target_lost_unknown_target_is_noop() {
        let mut store = TargetMemoryStore::new();
        store.record_target_lost(TargetId::new(), 1.0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_prune_respects_retention_boundary() {
        let mut store = TargetMemoryStore::new();
        let stale = TargetId::new();
        let fresh = TargetId::new();

        store.record_detection(stale, DetectionChannel::Visual, 0.9, Vec3::ZERO, 0.0);
        store.record_detection(fresh, DetectionChannel::Visual, 0.9, Vec3::ZERO, 25.0);

        // At t=31 the stale entry is 31s old (> 30s), the fresh one 6s
        store.prune_expired(31.0, 30.0);
        assert!(store.get(stale).is_none());
        assert!(store.get(fresh).is_some());
    }

    #[test]
    fn test_prune_keeps_entry_at_exact_retention() {
        let mut store = TargetMemoryStore::new();
        let target = TargetId::new();
        store.record_detection(target, DetectionChannel::Visual, 0.9, Vec3::ZERO, 0.0);

        // Exactly at the window: not yet expired
        store.prune_expired(30.0, 30.0);
        assert!(store.get(target).is_some());
    }

    #[test]
    fn test_refresh_defers_pruning() {
        let mut store = TargetMemoryStore::new();
        let target = TargetId::new();

        store.record_detection(target, DetectionChannel::Visual, 0.9, Vec3::ZERO, 0.0);
        store.record_target_lost(target, 20.0);

        // 20s-old last_seen survives a sweep at t=40 with 30s retention
        store.prune_expired(40.0, 30.0);
        assert!(store.get(target).is_some());
    }
}
