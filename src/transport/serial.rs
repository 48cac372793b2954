use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, StopBits};
use tokio_serial::SerialStream;
use tracing::info;

use crate::core::{Error, Result};

/// Opens the serial link to the board: 8 data bits, no parity, one stop bit,
/// no flow control.
pub fn open_serial(port: &str, baud_rate: u32) -> Result<SerialStream> {
    let builder = serialport::new(port, baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(Duration::from_millis(100));

    let stream = SerialStream::open(&builder)
        .map_err(|e| Error::transport(format!("Failed to open {}: {}", port, e)))?;
    info!(port, baud_rate, "serial port open");
    Ok(stream)
}
