//! Vigil - Perception Coordination for Stealth-Game NPC Groups
//!
//! The host game feeds raw sensory facts (sightings, sounds,
//! disturbances) into a [`coordinator::PerceptionCoordinator`], which
//! fuses them into per-agent suspicion, four-stage alert levels,
//! cooperative information sharing, and time-decaying target memory.
//! The host supplies positions and receives notifications through the
//! [`host::PerceptionHost`] trait; the engine never reaches into the
//! game's own world state.

pub mod alert;
pub mod cooperative;
pub mod coordinator;
pub mod core;
pub mod host;
pub mod memory;
pub mod perception;
pub mod scheduler;
