//! Runtime error types.

use crate::builder::BuildError;
use crate::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by the runtime driver
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    /// Every command handle was dropped while the sequence was not running,
    /// so nothing could start or resume it
    #[error("Command channel closed while the sequence was not running")]
    CommandsClosed,

    /// A command was sent after the runtime stopped
    #[error("Runtime has shut down")]
    ShutDown,
}
