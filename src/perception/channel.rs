//! Detection channels and their fixed tuning tables

use serde::{Deserialize, Serialize};

/// Sensory modality that produced a detection fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionChannel {
    /// Direct line of sight
    Visual,
    /// Heard footsteps, gunfire, thrown objects
    Auditory,
    /// Disturbed environment: opened doors, footprints, flickered lights
    Environmental,
    /// Secondhand knowledge relayed by a nearby peer
    Cooperative,
}

impl DetectionChannel {
    /// Multiplier applied to the stochastic detection chance
    ///
    /// Cooperative sits above 1.0: a warned agent is primed to confirm
    /// what it was told.
    pub fn chance_multiplier(&self) -> f32 {
        match self {
            Self::Visual => 1.0,
            Self::Auditory => 0.8,
            Self::Environmental => 0.6,
            Self::Cooperative => 1.2,
        }
    }

    /// Base suspicion gained from a full-strength detection
    pub fn base_increase(&self) -> f32 {
        match self {
            Self::Visual => 0.3,
            Self::Auditory => 0.2,
            Self::Environmental => 0.1,
            Self::Cooperative => 0.15,
        }
    }

    /// Reliability weight stored into memory entries
    ///
    /// Secondhand information is weighted below direct sight or hearing.
    pub fn reliability(&self) -> f32 {
        match self {
            Self::Visual => 0.9,
            Self::Auditory => 0.7,
            Self::Environmental => 0.5,
            Self::Cooperative => 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chance_multiplier_table() {
        assert_eq!(DetectionChannel::Visual.chance_multiplier(), 1.0);
        assert_eq!(DetectionChannel::Auditory.chance_multiplier(), 0.8);
        assert_eq!(DetectionChannel::Environmental.chance_multiplier(), 0.6);
        assert_eq!(DetectionChannel::Cooperative.chance_multiplier(), 1.2);
    }

    #[test]
    fn test_cooperative_reliability_below_direct_channels() {
        let coop = DetectionChannel::Cooperative.reliability();
        assert!(coop < DetectionChannel::Visual.reliability());
        assert!(coop < DetectionChannel::Auditory.reliability());
        assert_eq!(coop, 0.6);
    }

    #[test]
    fn test_visual_base_increase_matches_tuning() {
        assert_eq!(DetectionChannel::Visual.base_increase(), 0.3);
    }
}
