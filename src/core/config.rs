//! Engine configuration with documented constants
//!
//! All tunables are collected here with explanations of their purpose
//! and how they interact with each other. The coordinator falls back to
//! these defaults when it is never handed an explicit configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;

/// Tunable parameters for the perception coordination engine
///
/// These values have been tuned for stealth pacing at the documented
/// ~50-agent ceiling. Changing them affects how quickly agents escalate
/// and calm down.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    // === CAPACITY ===
    /// Maximum number of concurrently registered agents
    ///
    /// Registration beyond this count fails with `CapacityExceeded`.
    /// The cooperative fan-out is O(registered), so this is also the
    /// scale ceiling for the current sharing implementation.
    pub max_agents: usize,

    // === SUSPICION ===
    /// Suspicion lost per second of simulated time with no detections
    ///
    /// At the default (0.05/s) a fully alarmed agent (1.0) calms back to
    /// Unaware in 20 seconds of quiet.
    pub decay_rate: f32,

    // === COOPERATIVE SHARING ===
    /// Radius within which a detection is shared with peers (world units)
    pub cooperative_range: f32,

    /// Seconds a cooperative share record is kept before sweeping
    pub share_ttl: f64,

    // === MEMORY ===
    /// Seconds a target memory entry survives without refresh
    ///
    /// Pruning happens during scheduler passes, not on every write, to
    /// bound per-detection cost.
    pub memory_retention: f64,

    // === SCHEDULER ===
    /// Minimum simulated seconds between two scheduler passes
    ///
    /// Calls to `tick` inside this window are cadence-gated no-ops for
    /// the decay/prune pass (detections are still processed eagerly).
    pub update_frequency: f64,

    /// Maximum agents visited per scheduler pass
    ///
    /// Defaults to max_agents / 5 so a full round-robin sweep of a full
    /// roster takes five passes (~0.5 s at the default cadence).
    pub max_processing_per_frame: usize,

    // === EVENT POOL ===
    /// Capacity of the reusable detection event pool
    ///
    /// When exhausted, the oldest live event is recycled rather than
    /// allocating.
    pub event_pool_capacity: usize,

    /// Seconds a pooled detection event stays queryable before the
    /// scheduler resets it back to the free list
    pub event_ttl: f64,

    // === RANDOMNESS ===
    /// Seed for the stochastic detection gate
    ///
    /// Identical seeds and call sequences reproduce identical gate
    /// outcomes.
    pub seed: u64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            max_agents: 50,
            decay_rate: 0.05,
            cooperative_range: 15.0,
            share_ttl: 10.0,
            memory_retention: 30.0,
            update_frequency: 0.1,
            max_processing_per_frame: 10,
            event_pool_capacity: 64,
            event_ttl: 5.0,
            seed: 0,
        }
    }
}

impl PerceptionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    ///
    /// Missing fields fall back to defaults; the result is validated.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        use crate::core::error::VigilError;

        if self.max_agents == 0 {
            return Err(VigilError::InvalidConfiguration(
                "max_agents must be at least 1".into(),
            ));
        }
        if self.max_processing_per_frame == 0 {
            return Err(VigilError::InvalidConfiguration(
                "max_processing_per_frame must be at least 1".into(),
            ));
        }
        if self.decay_rate <= 0.0 {
            return Err(VigilError::InvalidConfiguration(format!(
                "decay_rate ({}) must be positive",
                self.decay_rate
            )));
        }
        if self.cooperative_range < 0.0 {
            return Err(VigilError::InvalidConfiguration(format!(
                "cooperative_range ({}) must not be negative",
                self.cooperative_range
            )));
        }
        if self.update_frequency <= 0.0 {
            return Err(VigilError::InvalidConfiguration(format!(
                "update_frequency ({}) must be positive",
                self.update_frequency
            )));
        }
        if self.memory_retention <= 0.0 || self.share_ttl <= 0.0 || self.event_ttl <= 0.0 {
            return Err(VigilError::InvalidConfiguration(
                "retention windows must be positive".into(),
            ));
        }
        if self.event_pool_capacity == 0 {
            return Err(VigilError::InvalidConfiguration(
                "event_pool_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
