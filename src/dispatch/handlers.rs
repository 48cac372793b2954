//! Built-in handlers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::protocol::constants::{PROTOCOL_MAJOR_VERSION, PROTOCOL_MINOR_VERSION, START_SYSEX};
use super::registry::Handler;

/// Default fallback: logs the unrouted code and bytes at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogUnrouted;

impl Handler for LogUnrouted {
    fn call(&mut self, code: u8, data: &[u8]) {
        let sysex = data.first() == Some(&START_SYSEX);
        debug!(sysex, data = ?HexBytes(data), "unrouted frame {:#04x}", code);
    }
}

/// Fallback that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct Ignore;

impl Handler for Ignore {
    fn call(&mut self, _code: u8, _data: &[u8]) {}
}

/// Compares a `REPORT_VERSION` frame against the version this host speaks
#[derive(Debug, Clone)]
pub struct VersionCheck {
    expected: (u8, u8),
    mismatch: Arc<AtomicBool>,
}

impl Default for VersionCheck {
    fn default() -> Self {
        Self::new(PROTOCOL_MAJOR_VERSION, PROTOCOL_MINOR_VERSION)
    }
}

impl VersionCheck {
    pub fn new(major: u8, minor: u8) -> Self {
        VersionCheck {
            expected: (major, minor),
            mismatch: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag set once a mismatching report has been seen
    pub fn mismatch_flag(&self) -> Arc<AtomicBool> {
        self.mismatch.clone()
    }

    /// Returns the reported version when it differs from the expected one
    pub fn check(&self, data: &[u8]) -> Option<(u8, u8)> {
        match data {
            [_, major, minor, ..] if (*major, *minor) != self.expected => Some((*major, *minor)),
            [_, _, _, ..] => None,
            _ => Some((data.get(1).copied().unwrap_or(0), 0)),
        }
    }
}

impl Handler for VersionCheck {
    fn call(&mut self, _code: u8, data: &[u8]) {
        if let Some((major, minor)) = self.check(data) {
            warn!(
                "Wrong protocol version: {}.{} (expected {}.{})",
                major, minor, self.expected.0, self.expected.1
            );
            self.mismatch.store(true, Ordering::Relaxed);
        }
    }
}

/// Lower-case hex rendering for log fields
pub(crate) struct HexBytes<'a>(pub &'a [u8]);

impl std::fmt::Debug for HexBytes<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:x}", byte)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_check_accepts_expected() {
        let mut check = VersionCheck::default();
        let flag = check.mismatch_flag();
        assert_eq!(check.check(&[0xF9, 0x02, 0x05]), None);
        check.call(0xF9, &[0xF9, 0x02, 0x05]);
        assert!(!flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_version_check_flags_mismatch() {
        let mut check = VersionCheck::default();
        let flag = check.mismatch_flag();
        assert_eq!(check.check(&[0xF9, 0x02, 0x03]), Some((2, 3)));
        check.call(0xF9, &[0xF9, 0x02, 0x03]);
        assert!(flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_version_check_short_frame_is_mismatch() {
        let check = VersionCheck::default();
        assert_eq!(check.check(&[0xF9]), Some((0, 0)));
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(format!("{:?}", HexBytes(&[0xF0, 0x6A, 0x07])), "[f0 6a 7]");
    }
}
