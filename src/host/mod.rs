//! Collaborator traits at the engine boundary
//!
//! The engine performs no raycasting, audio propagation, or entity
//! management of its own: the host supplies positions and stealth levels
//! on demand, and sensors hand in already-resolved detection facts. The
//! coordinator is constructed once by the host and handed these
//! collaborators by reference; there is no ambient global state.

use glam::Vec3;

use crate::alert::AlertTransition;
use crate::core::types::{AgentId, TargetId};
use crate::perception::DetectionFact;

/// World access and outward sinks the coordinator calls into
pub trait PerceptionHost {
    /// Current position of a registered agent
    ///
    /// Returning `None` means the handle is no longer valid; the
    /// scheduler lazily unregisters such agents on its next visit.
    fn agent_position(&self, agent: AgentId) -> Option<Vec3>;

    /// Whether the agent is alive and enabled
    fn agent_active(&self, agent: AgentId) -> bool {
        let _ = agent;
        true
    }

    /// How concealed a target currently is, in [0, 1]
    ///
    /// `None` lets the engine fall back to `DEFAULT_STEALTH_LEVEL`.
    fn stealth_level(&self, target: TargetId) -> Option<f32> {
        let _ = target;
        None
    }

    /// Fire-and-forget signal that a detection was processed
    ///
    /// Carries no payload; richer event data is reachable through the
    /// coordinator's query API.
    fn detection_occurred(&mut self) {}

    /// An agent's alert level actually changed
    fn alert_changed(&mut self, agent: AgentId, transition: AlertTransition) {
        let _ = (agent, transition);
    }
}

/// A line-of-sight sensor the coordinator polls for resolved sightings
pub trait VisualSensor {
    fn poll_sightings(&mut self, out: &mut Vec<DetectionFact>);
}

/// A sound-propagation sensor the coordinator polls for resolved sounds
pub trait AuditorySensor {
    fn poll_sounds(&mut self, out: &mut Vec<DetectionFact>);
}
