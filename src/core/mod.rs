pub mod config;
pub mod error;
pub mod types;

pub use config::PerceptionConfig;
pub use error::{Result, VigilError};
pub use types::{AgentId, SimTime, TargetId};
