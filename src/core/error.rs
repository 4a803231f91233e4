use thiserror::Error;

#[derive(Error, Debug)]
pub enum VigilError {
    #[error("Agent capacity exceeded: {max} agents already registered")]
    CapacityExceeded { max: usize },

    #[error("Invalid agent handle: {0:?}")]
    InvalidHandle(crate::core::types::AgentId),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, VigilError>;
