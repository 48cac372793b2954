//! Stateless builders for outgoing messages
//!
//! Values wider than 7 bits go out least-significant 7 bits first, each byte
//! with its top bit clear.

use bytes::{BufMut, Bytes, BytesMut};

use super::constants::{
    sysex, PinMode, END_SYSEX, REPORT_ANALOG, REPORT_DIGITAL, REPORT_VERSION, SET_DIGITAL_PIN_VALUE,
    SET_PIN_MODE, START_SYSEX, SYSTEM_RESET,
};

/// Largest value representable in two 7-bit bytes
pub const U14_MAX: u16 = 0x3FFF;

/// Splits a value into `[low 7 bits, high 7 bits]`; bits above 14 are dropped
pub fn encode_u14(value: u16) -> [u8; 2] {
    [(value & 0x7F) as u8, ((value >> 7) & 0x7F) as u8]
}

/// Joins two 7-bit bytes, low byte first
pub fn decode_u14(low: u8, high: u8) -> u16 {
    (u16::from(high & 0x7F) << 7) | u16::from(low & 0x7F)
}

/// `START_SYSEX, subcommand, payload.., END_SYSEX`
pub fn wrap_sysex(subcommand: u8, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(payload.len() + 3);
    buf.put_u8(START_SYSEX);
    buf.put_u8(subcommand & 0x7F);
    buf.extend(payload.iter().map(|b| b & 0x7F));
    buf.put_u8(END_SYSEX);
    buf.freeze()
}

pub fn reset() -> Bytes {
    Bytes::from_static(&[SYSTEM_RESET])
}

pub fn set_sampling_interval(interval_ms: u16) -> Bytes {
    wrap_sysex(sysex::SAMPLING_INTERVAL, &encode_u14(interval_ms))
}

pub fn request_analog_mapping() -> Bytes {
    wrap_sysex(sysex::ANALOG_MAPPING_QUERY, &[])
}

pub fn set_analog_reporting_enabled(pin: u8, enabled: bool) -> Bytes {
    Bytes::from(vec![REPORT_ANALOG | (pin & 0x0F), u8::from(enabled)])
}

pub fn set_digital_reporting_enabled(port: u8, enabled: bool) -> Bytes {
    Bytes::from(vec![REPORT_DIGITAL | (port & 0x0F), u8::from(enabled)])
}

pub fn set_pin_mode(pin: u8, mode: PinMode) -> Bytes {
    Bytes::from(vec![SET_PIN_MODE, pin & 0x7F, mode.code()])
}

pub fn set_digital_pin_value(pin: u8, high: bool) -> Bytes {
    Bytes::from(vec![SET_DIGITAL_PIN_VALUE, pin & 0x7F, u8::from(high)])
}

pub fn request_version() -> Bytes {
    Bytes::from_static(&[REPORT_VERSION])
}

pub fn request_firmware() -> Bytes {
    wrap_sysex(sysex::REPORT_FIRMWARE, &[])
}

pub fn request_capabilities() -> Bytes {
    wrap_sysex(sysex::CAPABILITY_QUERY, &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_interval_layout() {
        assert_eq!(set_sampling_interval(500).as_ref(), &[0xF0, 0x7A, 0x74, 0x03, 0xF7]);
    }

    #[test]
    fn test_sampling_interval_recovers_value() {
        for x in (0..=U14_MAX).step_by(7).chain([1, 127, 128, U14_MAX]) {
            let bytes = set_sampling_interval(x);
            assert_eq!(decode_u14(bytes[2], bytes[3]), x);
            assert!(bytes[2] < 0x80 && bytes[3] < 0x80);
        }
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(reset().as_ref(), &[0xFF]);
        assert_eq!(request_analog_mapping().as_ref(), &[0xF0, 0x69, 0xF7]);
        assert_eq!(request_firmware().as_ref(), &[0xF0, 0x79, 0xF7]);
        assert_eq!(request_version().as_ref(), &[0xF9]);
    }

    #[test]
    fn test_reporting_enable() {
        assert_eq!(set_analog_reporting_enabled(0, true).as_ref(), &[0xC0, 0x01]);
        assert_eq!(set_analog_reporting_enabled(0x13, false).as_ref(), &[0xC3, 0x00]);
        assert_eq!(set_digital_reporting_enabled(1, true).as_ref(), &[0xD1, 0x01]);
    }

    #[test]
    fn test_pin_messages() {
        assert_eq!(set_pin_mode(13, PinMode::Output).as_ref(), &[0xF4, 0x0D, 0x01]);
        assert_eq!(set_digital_pin_value(13, true).as_ref(), &[0xF5, 0x0D, 0x01]);
    }

    #[test]
    fn test_wrap_sysex() {
        assert_eq!(wrap_sysex(0x71, &[0x41, 0x00]).as_ref(), &[0xF0, 0x71, 0x41, 0x00, 0xF7]);
    }

    #[test]
    fn test_decode_u14() {
        assert_eq!(decode_u14(0x10, 0x02), 272);
        assert_eq!(decode_u14(0x7F, 0x7F), U14_MAX);
    }
}
