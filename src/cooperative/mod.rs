//! Cooperative detection bookkeeping
//!
//! The fan-out itself lives in the coordinator (it needs the roster and
//! host positions); this module owns the short-lived records of what was
//! shared, swept on a fixed TTL by the scheduler.

use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, SimTime, TargetId};
use crate::perception::channel::DetectionChannel;

/// Dampening applied to secondhand suspicion
///
/// A peer told about a detection gains 0.3x the detecting agent's own
/// suspicion increase.
pub const SHARE_DAMPENING: f32 = 0.3;

/// One detection shared from an agent to its nearby peers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShareRecord {
    pub detector: AgentId,
    pub target: TargetId,
    /// Channel of the originating (direct) detection
    pub channel: DetectionChannel,
    /// Detector's suspicion value at share time
    pub suspicion: f32,
    pub timestamp: SimTime,
    /// How many peers received the share
    pub recipients: usize,
}

/// Append-only log of recent shares, TTL-swept by the scheduler
///
/// Low volume (one record per qualifying detection), so unlike detection
/// events these are not pooled.
#[derive(Debug, Clone, Default)]
pub struct ShareLog {
    records: Vec<ShareRecord>,
}

impl ShareLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ShareRecord) {
        self.records.push(record);
    }

    /// Discard records older than the TTL
    pub fn sweep(&mut self, now: SimTime, ttl: SimTime) {
        self.records.retain(|record| now - record.timestamp <= ttl);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShareRecord> {
        self.records.iter()
    }

    /// Drop every record involving an agent that left the roster
    pub fn forget_agent(&mut self, agent: AgentId) {
        self.records.retain(|record| record.detector != agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: SimTime) -> ShareRecord {
        ShareRecord {
            detector: AgentId::new(),
            target: TargetId::new(),
            channel: DetectionChannel::Visual,
            suspicion: 0.4,
            timestamp,
            recipients: 2,
        }
    }

    #[test]
    fn test_sweep_respects_ttl() {
        let mut log = ShareLog::new();
        log.push(record(0.0));
        log.push(record(8.0));

        log.sweep(12.0, 10.0);
        assert_eq!(log.len(), 1);
        assert_eq!(log.iter().next().unwrap().timestamp, 8.0);
    }

    #[test]
    fn test_sweep_keeps_record_at_exact_ttl() {
        let mut log = ShareLog::new();
        log.push(record(0.0));
        log.sweep(10.0, 10.0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_forget_agent_removes_their_shares() {
        let mut log = ShareLog::new();
        let mut mine = record(1.0);
        let agent = AgentId::new();
        mine.detector = agent;
        log.push(mine);
        log.push(record(1.0));

        log.forget_agent(agent);
        assert_eq!(log.len(), 1);
        assert!(log.iter().all(|r| r.detector != agent));
    }
}
