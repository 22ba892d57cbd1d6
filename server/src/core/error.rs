// tile_world/server/src/core/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldError {
    /// A map file or config source that should exist is absent.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Short header, short tile record or an unparsable numeric field.
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Duplicate map id, dangling map reference or missing spawn record.
    #[error("Configuration inconsistency: {0}")]
    ConfigInconsistency(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
