//! Core type definitions used throughout the engine

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a perceiving agent
///
/// The engine never creates or destroys the underlying entity; it only
/// tracks state keyed by this handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Placeholder handle for reset pooled events
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a detection target (player, decoy, noise source)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetId(pub Uuid);

impl TargetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// Simulated time in seconds, accumulated from `tick(dt)` calls
pub type SimTime = f64;

/// Clamp a scalar into the [0, 1] range
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
