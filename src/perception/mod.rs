//! Detection fusion: channels, pooled events, and the chance/delta math
//!
//! The engine never performs line-of-sight or sound propagation itself;
//! external sensors hand it already-resolved facts and this module turns
//! them into suspicion deltas and memory entries.

pub mod channel;
pub mod event;
pub mod processor;

pub use channel::DetectionChannel;
pub use event::{DetectionEvent, DetectionEventPool};
pub use processor::{detection_chance, suspicion_increase, DEFAULT_STEALTH_LEVEL};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::{AgentId, TargetId};

/// A resolved sensory fact produced by an external sensor
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectionFact {
    /// The agent that perceived something
    pub agent: AgentId,
    /// What it perceived
    pub target: TargetId,
    /// Where the target was at detection time
    pub position: Vec3,
    /// Sensory modality of the detection
    pub channel: DetectionChannel,
    /// Externally computed raw strength of the detection
    pub strength: f32,
}

/// Descriptor of a perceived target, as handed in by the host
#[derive(Debug, Clone, Copy)]
pub struct TargetObservation {
    pub target: TargetId,
    /// Last known position of the target
    pub position: Vec3,
    /// External confidence in the observation, in [0, 1]
    pub confidence: f32,
}

impl TargetObservation {
    pub fn new(target: TargetId, position: Vec3) -> Self {
        Self {
            target,
            position,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }
}
