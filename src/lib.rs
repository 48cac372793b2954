//! Firmata host: framing, dispatch and connect-time handshake
//! 
//! This library decodes the Firmata byte stream coming from a microcontroller
//! into frames, routes them to registered handlers, encodes outgoing control
//! messages, and drives the reset/configure/query handshake that must succeed
//! before steady-state traffic is trusted.
//!
//! # Examples
//!
//! ```no_run
//! use firmata_host::core::Config;
//! use firmata_host::dispatch::Dispatcher;
//! use firmata_host::protocol::constants::ANALOG_MESSAGE;
//! use firmata_host::transport::{attach, open_serial};
//!
//! #[tokio::main]
//! async fn main() -> firmata_host::Result<()> {
//!     let config = Config::default();
//!     let mut dispatcher = Dispatcher::new();
//!     dispatcher.register(ANALOG_MESSAGE, |_: u8, data: &[u8]| println!("{:?}", data));
//!
//!     let port = open_serial(&config.port, config.baud_rate)?;
//!     let (mut controller, _reader) = attach(port, dispatcher, config.sync);
//!     controller.run().await
//! }
//! ```
pub mod core;
pub mod dispatch;
pub mod protocol;
pub mod sync;
pub mod transport;

// Re-export commonly used items
pub use core::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
