//! Reusable detection event records
//!
//! Events are preallocated once and cycled through an initialize/reset
//! lifecycle instead of being heap-allocated per detection. A live event
//! stays queryable (see `PerceptionCoordinator::recent_events`) until the
//! scheduler sweeps it or the pool recycles it under pressure.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, SimTime, TargetId};
use crate::perception::channel::DetectionChannel;

/// A transient record of one successful detection
///
/// Only logically valid between `initialize` and `reset`; callers must not
/// read an event whose `valid` flag is false.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub detector: AgentId,
    pub target: TargetId,
    /// Target's last known position at detection time
    pub position: Vec3,
    pub channel: DetectionChannel,
    /// Detector's suspicion value after the detection was applied
    pub suspicion: f32,
    pub timestamp: SimTime,
    pub valid: bool,
}

impl DetectionEvent {
    fn blank() -> Self {
        Self {
            detector: AgentId::nil(),
            target: TargetId::nil(),
            position: Vec3::ZERO,
            channel: DetectionChannel::Visual,
            suspicion: 0.0,
            timestamp: 0.0,
            valid: false,
        }
    }

    pub fn initialize(
        &mut self,
        detector: AgentId,
        target: TargetId,
        position: Vec3,
        channel: DetectionChannel,
        suspicion: f32,
        timestamp: SimTime,
    ) {
        self.detector = detector;
        self.target = target;
        self.position = position;
        self.channel = channel;
        self.suspicion = suspicion;
        self.timestamp = timestamp;
        self.valid = true;
    }

    pub fn reset(&mut self) {
        *self = Self::blank();
    }
}

/// Fixed-capacity free-list pool of detection events
#[derive(Debug, Clone)]
pub struct DetectionEventPool {
    events: Vec<DetectionEvent>,
    free: Vec<usize>,
    /// Indices of in-use events, oldest first
    live: Vec<usize>,
}

impl DetectionEventPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: vec![DetectionEvent::blank(); capacity],
            free: (0..capacity).rev().collect(),
            live: Vec::with_capacity(capacity),
        }
    }

    /// Hand out an event slot, recycling the oldest live event when the
    /// free list is empty
    pub fn acquire(&mut self) -> usize {
        if let Some(idx) = self.free.pop() {
            self.live.push(idx);
            idx
        } else {
            let idx = self.live.remove(0);
            self.events[idx].reset();
            self.live.push(idx);
            idx
        }
    }

    /// Reset an event and return its slot to the free list
    pub fn release(&mut self, idx: usize) {
        if let Some(pos) = self.live.iter().position(|&i| i == idx) {
            self.live.remove(pos);
            self.events[idx].reset();
            self.free.push(idx);
        }
    }

    /// Release live events whose timestamp fell outside the TTL window
    pub fn sweep_expired(&mut self, now: SimTime, ttl: SimTime) {
        let mut kept = Vec::with_capacity(self.live.len());
        for &idx in &self.live {
            if now - self.events[idx].timestamp > ttl {
                self.events[idx].reset();
                self.free.push(idx);
            } else {
                kept.push(idx);
            }
        }
        self.live = kept;
    }

    pub fn get(&self, idx: usize) -> &DetectionEvent {
        &self.events[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut DetectionEvent {
        &mut self.events[idx]
    }

    /// In-use events, oldest first
    pub fn live_events(&self) -> impl Iterator<Item = &DetectionEvent> {
        self.live
            .iter()
            .map(|&idx| &self.events[idx])
            .filter(|event| event.valid)
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }
}
