//! Pure detection math: chance gating and suspicion deltas
//!
//! Kept free of engine state so the formulas are testable in isolation;
//! the coordinator wires them to the roster, RNG, and host queries.

use crate::alert::AlertLevel;
use crate::core::types::clamp01;
use crate::perception::channel::DetectionChannel;

/// Stealth level assumed when the host cannot answer the query
pub const DEFAULT_STEALTH_LEVEL: f32 = 0.5;

/// Probability that a raw sensory fact becomes an actual detection
///
/// Stealthier targets are harder to notice; agents already on alert
/// notice more. The result is clamped to [0, 1], so a chance of 1.0
/// (e.g. an unconcealed target seen by a Combat agent) always passes
/// the gate.
pub fn detection_chance(
    target_stealth: f32,
    channel: DetectionChannel,
    alert: AlertLevel,
) -> f32 {
    clamp01((1.0 - target_stealth) * channel.chance_multiplier() * alert.escalation_multiplier())
}

/// Suspicion delta applied to the detecting agent on a successful gate
pub fn suspicion_increase(channel: DetectionChannel, strength: f32, confidence: f32) -> f32 {
    channel.base_increase() * clamp01(strength) * clamp01(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chance_fully_stealthed_target_is_zero() {
        let chance = detection_chance(1.0, DetectionChannel::Visual, AlertLevel::Combat);
        assert_eq!(chance, 0.0);
    }

    #[test]
    fn test_chance_unconcealed_combat_agent_is_certain() {
        // (1 - 0) * 1.0 * 1.5 clamps to 1.0
        let chance = detection_chance(0.0, DetectionChannel::Visual, AlertLevel::Combat);
        assert_eq!(chance, 1.0);
    }

    #[test]
    fn test_chance_unaware_visual_baseline() {
        let chance = detection_chance(0.0, DetectionChannel::Visual, AlertLevel::Unaware);
        assert!((chance - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_chance_scales_with_channel_and_alert() {
        let quiet = detection_chance(0.5, DetectionChannel::Auditory, AlertLevel::Unaware);
        let alarmed = detection_chance(0.5, DetectionChannel::Auditory, AlertLevel::Alert);
        assert!(alarmed > quiet);
        assert!((quiet - 0.5 * 0.8 * 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_increase_visual_full_strength() {
        let inc = suspicion_increase(DetectionChannel::Visual, 1.0, 1.0);
        assert!((inc - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_increase_scaled_by_strength_and_confidence() {
        let inc = suspicion_increase(DetectionChannel::Auditory, 0.5, 0.5);
        assert!((inc - 0.2 * 0.5 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_increase_clamps_out_of_range_inputs() {
        let inc = suspicion_increase(DetectionChannel::Visual, 3.0, 2.0);
        assert!((inc - 0.3).abs() < 1e-6);
        assert_eq!(suspicion_increase(DetectionChannel::Visual, -1.0, 1.0), 0.0);
    }
}
