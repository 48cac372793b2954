//! Core types and traits for the Firmata host
//! 
//! This module contains the error type, configuration, and the serde helpers
//! used by the configuration file format.

pub mod error;
pub mod types;
pub mod serde;

pub use self::error::{Error, Result};
pub use self::types::{Config, LogLevel};

/// Default bit rate for the serial link
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default serial device
pub const DEFAULT_PORT: &str = "/dev/ttyAMA0";
