use bytes::Bytes;

use super::constants::PinMode;
use super::encoder;

/// Outgoing messages the host sends to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// System reset
    Reset,
    /// Main loop poll rate in milliseconds
    SamplingInterval(u16),
    /// Ask which pins are analog-capable
    AnalogMappingQuery,
    /// Toggle analog reporting for one analog pin
    ReportAnalog {
        /// Analog pin (low nibble only)
        pin: u8,
        enabled: bool,
    },
    /// Toggle digital reporting for an 8-pin port
    ReportDigital {
        port: u8,
        enabled: bool,
    },
    SetPinMode {
        pin: u8,
        mode: PinMode,
    },
    SetDigitalPinValue {
        pin: u8,
        high: bool,
    },
    /// Ask for the protocol version
    VersionQuery,
    /// Ask for firmware name and version
    FirmwareQuery,
    CapabilityQuery,
    /// Any other SysEx message
    Sysex {
        subcommand: u8,
        payload: Vec<u8>,
    },
}

impl Request {
    /// Wire bytes for this message
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Request::Reset => encoder::reset(),
            Request::SamplingInterval(ms) => encoder::set_sampling_interval(*ms),
            Request::AnalogMappingQuery => encoder::request_analog_mapping(),
            Request::ReportAnalog { pin, enabled } => {
                encoder::set_analog_reporting_enabled(*pin, *enabled)
            }
            Request::ReportDigital { port, enabled } => {
                encoder::set_digital_reporting_enabled(*port, *enabled)
            }
            Request::SetPinMode { pin, mode } => encoder::set_pin_mode(*pin, *mode),
            Request::SetDigitalPinValue { pin, high } => encoder::set_digital_pin_value(*pin, *high),
            Request::VersionQuery => encoder::request_version(),
            Request::FirmwareQuery => encoder::request_firmware(),
            Request::CapabilityQuery => encoder::request_capabilities(),
            Request::Sysex { subcommand, payload } => encoder::wrap_sysex(*subcommand, payload),
        }
    }

    /// The connect-time burst: reset, sampling interval, analog mapping query
    pub fn sync_burst(sampling_interval: u16) -> [Request; 3] {
        [
            Request::Reset,
            Request::SamplingInterval(sampling_interval),
            Request::AnalogMappingQuery,
        ]
    }
}
