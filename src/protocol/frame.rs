use std::fmt;

use bytes::Bytes;

use super::constants::{ANALOG_MESSAGE, END_SYSEX, REPORT_VERSION, START_SYSEX};
use super::encoder::decode_u14;

/// One fully decoded protocol message
///
/// `data` holds the message exactly as received, status byte(s) included.
/// A SysEx frame carries its subcommand separately and keeps both markers in
/// `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    command: u8,
    subcommand: Option<u8>,
    data: Bytes,
}

impl Frame {
    /// Creates a fixed-length command frame
    pub fn command(command: u8, data: impl Into<Bytes>) -> Self {
        Frame {
            command,
            subcommand: None,
            data: data.into(),
        }
    }

    /// Creates a SysEx frame from a buffer holding both markers.
    ///
    /// Returns `None` when the buffer has no subcommand byte.
    pub fn sysex(data: impl Into<Bytes>) -> Option<Self> {
        let data = data.into();
        if data.len() <= 2 || data[0] != START_SYSEX {
            return None;
        }
        Some(Frame {
            command: START_SYSEX,
            subcommand: Some(data[1]),
            data,
        })
    }

    /// Command code, pin/port nibble cleared
    pub fn code(&self) -> u8 {
        self.command
    }

    /// SysEx subcommand, if this is a SysEx frame
    pub fn subcommand(&self) -> Option<u8> {
        self.subcommand
    }

    /// Raw bytes as received
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_sysex(&self) -> bool {
        self.subcommand.is_some()
    }

    /// Pin or port index carried in the low nibble of the status byte
    pub fn pin(&self) -> u8 {
        self.data.first().map(|status| status & 0x0F).unwrap_or(0)
    }

    /// Message body without status byte, subcommand or end marker
    pub fn payload(&self) -> &[u8] {
        if self.is_sysex() {
            let end = if self.data.last() == Some(&END_SYSEX) {
                self.data.len() - 1
            } else {
                self.data.len()
            };
            &self.data[2..end]
        } else {
            &self.data[1.min(self.data.len())..]
        }
    }

    /// 14-bit value of a two-byte body (low 7 bits first)
    pub fn value_u14(&self) -> Option<u16> {
        match self.payload() {
            [lo, hi] if !self.is_sysex() => Some(decode_u14(*lo, *hi)),
            _ => None,
        }
    }

    /// `(pin, value)` of an analog message
    pub fn analog_value(&self) -> Option<(u8, u16)> {
        if self.command != ANALOG_MESSAGE {
            return None;
        }
        self.value_u14().map(|value| (self.pin(), value))
    }

    /// `(major, minor)` of a version report
    pub fn protocol_version(&self) -> Option<(u8, u8)> {
        match (self.command, self.data.as_ref()) {
            (REPORT_VERSION, [_, major, minor, ..]) => Some((*major, *minor)),
            _ => None,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subcommand {
            Some(sub) => write!(f, "SYSEX {:02x} [", sub)?,
            None => write!(f, "{:02x} [", self.command)?,
        }
        for (i, byte) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sysex_requires_subcommand() {
        assert!(Frame::sysex(vec![0xF0, 0xF7]).is_none());
        let frame = Frame::sysex(vec![0xF0, 0x79, 0x02, 0x05, 0xF7]).unwrap();
        assert_eq!(frame.code(), START_SYSEX);
        assert_eq!(frame.subcommand(), Some(0x79));
        assert_eq!(frame.payload(), &[0x02, 0x05]);
    }

    #[test]
    fn test_analog_value() {
        let frame = Frame::command(ANALOG_MESSAGE, vec![0xE3, 0x10, 0x02]);
        assert_eq!(frame.pin(), 3);
        assert_eq!(frame.analog_value(), Some((3, 272)));
    }

    #[test]
    fn test_protocol_version() {
        let frame = Frame::command(REPORT_VERSION, vec![0xF9, 0x02, 0x05]);
        assert_eq!(frame.protocol_version(), Some((2, 5)));
        assert_eq!(frame.analog_value(), None);
    }

    #[test]
    fn test_display() {
        let frame = Frame::sysex(vec![0xF0, 0x6A, 0x7F, 0xF7]).unwrap();
        assert_eq!(frame.to_string(), "SYSEX 6a [f0 6a 7f f7]");
        let frame = Frame::command(0x90, vec![0x91, 0x01, 0x00]);
        assert_eq!(frame.to_string(), "90 [91 01 00]");
    }
}
