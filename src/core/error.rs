use std::io;
use std::time::Duration;
use thiserror::Error;

/// Custom error types for the Firmata host
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Frame channel closed")]
    ChannelClosed,

    #[error("Handshake timed out after {attempts} attempts ({elapsed:?})")]
    SyncTimeout {
        /// Number of sync bursts sent
        attempts: u32,
        /// Time spent in the handshake phase
        elapsed: Duration,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Creates a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether the error ends the current session
    pub fn is_channel_failure(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Transport(_) | Error::ChannelClosed)
    }
}
