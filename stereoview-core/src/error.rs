//! Error types for the stereo viewer core

use thiserror::Error;

/// Main error type for stereoview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] ron::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A projection build is still running; buffers are not readable and
    /// another build may not be started until `wait()` returns.
    #[error("projection build still in flight")]
    BuildInFlight,

    #[error("projection worker panicked")]
    WorkerPanicked,
}

/// Result type alias for stereoview operations
pub type Result<T> = std::result::Result<T, Error>;
