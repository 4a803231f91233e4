//! Property tests for the suspicion/alert state machine

use proptest::prelude::*;

use vigil::alert::{AlertLevel, SuspicionMeter};
use vigil::core::types::clamp01;
use vigil::perception::channel::DetectionChannel;
use vigil::perception::{detection_chance, suspicion_increase};

#[derive(Debug, Clone, Copy)]
enum Op {
    Raise(f32),
    Decay { rate: f32, elapsed: f32 },
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0f32..2.0).prop_map(Op::Raise),
        ((0.0f32..1.0), (0.0f32..30.0)).prop_map(|(rate, elapsed)| Op::Decay { rate, elapsed }),
        Just(Op::Reset),
    ]
}

fn channel_strategy() -> impl Strategy<Value = DetectionChannel> {
    prop_oneof![
        Just(DetectionChannel::Visual),
        Just(DetectionChannel::Auditory),
        Just(DetectionChannel::Environmental),
        Just(DetectionChannel::Cooperative),
    ]
}

proptest! {
    /// Suspicion stays in [0, 1] and the level always matches the value,
    /// no matter what sequence of raises, decays, and resets is applied.
    #[test]
    fn meter_value_and_level_stay_consistent(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut meter = SuspicionMeter::new();
        for op in ops {
            let transition = match op {
                Op::Raise(amount) => meter.raise(amount),
                Op::Decay { rate, elapsed } => meter.decay(rate, elapsed),
                Op::Reset => meter.reset(),
            };
            prop_assert!((0.0..=1.0).contains(&meter.value()));
            prop_assert_eq!(meter.level(), AlertLevel::from_suspicion(meter.value()));
            if let Some(t) = transition {
                prop_assert_ne!(t.from, t.to);
                prop_assert_eq!(t.to, meter.level());
            }
        }
    }

    /// Raising is monotone: suspicion never drops when a detection lands.
    #[test]
    fn raise_never_lowers_suspicion(
        initial in 0.0f32..2.0,
        amount in 0.0f32..2.0,
    ) {
        let mut meter = SuspicionMeter::new();
        meter.raise(initial);
        let before = meter.value();
        meter.raise(amount);
        prop_assert!(meter.value() >= before);
    }

    /// The detection gate probability is a valid probability for any
    /// stealth input, including out-of-range ones.
    #[test]
    fn detection_chance_is_a_probability(
        stealth in -2.0f32..3.0,
        channel in channel_strategy(),
        suspicion in 0.0f32..1.0,
    ) {
        let chance = detection_chance(stealth, channel, AlertLevel::from_suspicion(suspicion));
        prop_assert!((0.0..=1.0).contains(&chance));
    }

    /// A suspicion increase never exceeds the channel's base increase.
    #[test]
    fn increase_bounded_by_channel_base(
        channel in channel_strategy(),
        strength in -2.0f32..3.0,
        confidence in -2.0f32..3.0,
    ) {
        let increase = suspicion_increase(channel, strength, confidence);
        prop_assert!(increase >= 0.0);
        prop_assert!(increase <= channel.base_increase() + f32::EPSILON);
    }

    /// clamp01 is idempotent and always lands in range.
    #[test]
    fn clamp01_lands_in_range(value in -10.0f32..10.0) {
        let clamped = clamp01(value);
        prop_assert!((0.0..=1.0).contains(&clamped));
        prop_assert_eq!(clamp01(clamped), clamped);
    }
}
