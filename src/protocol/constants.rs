//! Firmata command bytes, SysEx subcommands and pin modes

/// Protocol version this host speaks, as reported by `REPORT_VERSION`
pub const PROTOCOL_MAJOR_VERSION: u8 = 2;
/// Minor half of the protocol version
pub const PROTOCOL_MINOR_VERSION: u8 = 5;

/// Maximum number of data bytes in an incoming message
pub const MAX_DATA_BYTES: usize = 64;

// Command bytes (0x80-0xFF). Codes below 0xF0 carry a pin or port in the low nibble.
pub const DIGITAL_MESSAGE: u8 = 0x90;
pub const ANALOG_MESSAGE: u8 = 0xE0;
pub const REPORT_ANALOG: u8 = 0xC0;
pub const REPORT_DIGITAL: u8 = 0xD0;

pub const SET_PIN_MODE: u8 = 0xF4;
pub const SET_DIGITAL_PIN_VALUE: u8 = 0xF5;
pub const REPORT_VERSION: u8 = 0xF9;
pub const START_SYSEX: u8 = 0xF0;
pub const END_SYSEX: u8 = 0xF7;
pub const SYSTEM_RESET: u8 = 0xFF;

/// Extended command set carried inside SysEx (0x00-0x7F)
pub mod sysex {
    pub const SERIAL_MESSAGE: u8 = 0x60;
    pub const ENCODER_DATA: u8 = 0x61;
    pub const ANALOG_MAPPING_QUERY: u8 = 0x69;
    pub const ANALOG_MAPPING_RESPONSE: u8 = 0x6A;
    pub const CAPABILITY_QUERY: u8 = 0x6B;
    pub const CAPABILITY_RESPONSE: u8 = 0x6C;
    pub const PIN_STATE_QUERY: u8 = 0x6D;
    pub const PIN_STATE_RESPONSE: u8 = 0x6E;
    pub const EXTENDED_ANALOG: u8 = 0x6F;
    pub const SERVO_CONFIG: u8 = 0x70;
    pub const STRING_DATA: u8 = 0x71;
    pub const I2C_REQUEST: u8 = 0x76;
    pub const I2C_REPLY: u8 = 0x77;
    pub const I2C_CONFIG: u8 = 0x78;
    pub const REPORT_FIRMWARE: u8 = 0x79;
    pub const SAMPLING_INTERVAL: u8 = 0x7A;
    pub const SYSEX_NON_REALTIME: u8 = 0x7E;
    pub const SYSEX_REALTIME: u8 = 0x7F;
}

/// Pin modes accepted by `SET_PIN_MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PinMode {
    Input = 0x00,
    Output = 0x01,
    Analog = 0x02,
    Pwm = 0x03,
    Servo = 0x04,
    Shift = 0x05,
    I2c = 0x06,
    OneWire = 0x07,
    Stepper = 0x08,
    Encoder = 0x09,
    Serial = 0x0A,
    Pullup = 0x0B,
    Ignore = 0x7F,
}

impl PinMode {
    /// Wire value of the mode
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for PinMode {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0x00 => PinMode::Input,
            0x01 => PinMode::Output,
            0x02 => PinMode::Analog,
            0x03 => PinMode::Pwm,
            0x04 => PinMode::Servo,
            0x05 => PinMode::Shift,
            0x06 => PinMode::I2c,
            0x07 => PinMode::OneWire,
            0x08 => PinMode::Stepper,
            0x09 => PinMode::Encoder,
            0x0A => PinMode::Serial,
            0x0B => PinMode::Pullup,
            0x7F => PinMode::Ignore,
            other => return Err(other),
        })
    }
}

/// Whether a byte starts a command rather than carrying data
pub fn is_status_byte(byte: u8) -> bool {
    byte & 0x80 != 0
}

/// Command code for a status byte: system commands keep all bits, channel
/// commands drop the pin/port nibble.
pub fn command_code(status: u8) -> u8 {
    if status >= 0xF0 {
        status
    } else {
        status & 0xF0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_code() {
        assert_eq!(command_code(0xE3), ANALOG_MESSAGE);
        assert_eq!(command_code(0x9F), DIGITAL_MESSAGE);
        assert_eq!(command_code(0xF9), REPORT_VERSION);
        assert_eq!(command_code(0xFF), SYSTEM_RESET);
    }

    #[test]
    fn test_pin_mode_codes() {
        assert_eq!(PinMode::Pullup.code(), 0x0B);
        assert_eq!(PinMode::try_from(0x03), Ok(PinMode::Pwm));
        assert_eq!(PinMode::try_from(0x0C), Err(0x0C));
    }

    #[test]
    fn test_status_byte() {
        assert!(is_status_byte(0x80));
        assert!(!is_status_byte(0x7F));
    }
}
