//! Suspicion scalar and the alert-level state machine derived from it
//!
//! Alert level is a pure function of the current suspicion value; nothing
//! in the engine sets the level directly, so the two can never disagree at
//! a query boundary.

use serde::{Deserialize, Serialize};

use crate::core::types::clamp01;

/// Discrete escalation tier, ordered from calm to fully engaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Unaware,
    Suspicious,
    Alert,
    Combat,
}

impl AlertLevel {
    /// Threshold table mapping suspicion to alert level
    pub fn from_suspicion(suspicion: f32) -> Self {
        match suspicion {
            s if s <= 0.2 => Self::Unaware,
            s if s <= 0.5 => Self::Suspicious,
            s if s <= 0.7 => Self::Alert,
            _ => Self::Combat,
        }
    }

    /// How much an agent's current vigilance scales its detection chance
    ///
    /// Agents already on edge notice things more readily.
    pub fn escalation_multiplier(&self) -> f32 {
        match self {
            Self::Unaware => 0.8,
            Self::Suspicious => 1.0,
            Self::Alert => 1.2,
            Self::Combat => 1.5,
        }
    }
}

/// An actual alert-level change
///
/// Emitted only when the derived level differs from the previous one;
/// reapplying the same suspicion value produces no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertTransition {
    pub from: AlertLevel,
    pub to: AlertLevel,
}

/// Per-agent suspicion scalar with its derived alert level
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuspicionMeter {
    value: f32,
    level: AlertLevel,
}

impl SuspicionMeter {
    pub fn new() -> Self {
        Self {
            value: 0.0,
            level: AlertLevel::Unaware,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn level(&self) -> AlertLevel {
        self.level
    }

    /// Set the suspicion value (clamped) and re-derive the alert level
    fn set(&mut self, value: f32) -> Option<AlertTransition> {
        self.value = clamp01(value);
        let derived = AlertLevel::from_suspicion(self.value);
        if derived != self.level {
            let transition = AlertTransition {
                from: self.level,
                to: derived,
            };
            self.level = derived;
            Some(transition)
        } else {
            None
        }
    }

    /// Increase suspicion by a detection delta
    pub fn raise(&mut self, amount: f32) -> Option<AlertTransition> {
        self.set(self.value + amount)
    }

    /// Apply time decay toward zero
    pub fn decay(&mut self, rate: f32, elapsed: f32) -> Option<AlertTransition> {
        self.set((self.value - rate * elapsed).max(0.0))
    }

    /// Drop back to zero suspicion / Unaware
    pub fn reset(&mut self) -> Option<AlertTransition> {
        self.set(0.0)
    }
}

impl Default for SuspicionMeter {
    fn default() -> Self {
        Self::new()
    }
}
