use bytes::{BufMut, BytesMut};

use super::constants::{
    command_code, is_status_byte, END_SYSEX, MAX_DATA_BYTES, REPORT_ANALOG, REPORT_DIGITAL,
    START_SYSEX, SYSTEM_RESET,
};
use super::frame::Frame;

/// How many more bytes the active command needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// A fixed number of data bytes
    FixedCount(u8),
    /// Everything up to `END_SYSEX`
    UntilTerminator,
}

impl Remaining {
    /// Expected body length for a command code
    pub fn for_command(command: u8) -> Self {
        match command {
            START_SYSEX => Remaining::UntilTerminator,
            SYSTEM_RESET => Remaining::FixedCount(0),
            REPORT_ANALOG | REPORT_DIGITAL => Remaining::FixedCount(1),
            _ => Remaining::FixedCount(2),
        }
    }
}

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    /// No command in progress
    Idle,
    /// Accumulating the body of `command`
    Collecting {
        command: u8,
        remaining: Remaining,
    },
}

/// Byte-at-a-time Firmata frame decoder
///
/// Output depends only on the byte sequence, never on how it was chunked.
/// Malformed input (stray terminators, empty SysEx bodies, commands cut short
/// by a new status byte) is dropped without error.
#[derive(Debug)]
pub struct FrameDecoder {
    state: DecoderState,
    buffer: BytesMut,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Creates an idle decoder
    pub fn new() -> Self {
        FrameDecoder {
            state: DecoderState::Idle,
            buffer: BytesMut::with_capacity(MAX_DATA_BYTES + 2),
        }
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Feeds one byte, returning the frame it completes, if any
    pub fn feed(&mut self, byte: u8) -> Option<Frame> {
        if byte == END_SYSEX {
            self.terminate()
        } else if is_status_byte(byte) {
            self.start(byte)
        } else {
            self.collect(byte)
        }
    }

    /// Feeds a slice, collecting every completed frame
    pub fn feed_all(&mut self, bytes: &[u8]) -> Vec<Frame> {
        bytes.iter().filter_map(|&b| self.feed(b)).collect()
    }

    fn start(&mut self, status: u8) -> Option<Frame> {
        let command = command_code(status);
        self.buffer.clear();
        self.buffer.put_u8(status);

        match Remaining::for_command(command) {
            Remaining::FixedCount(0) => self.finish(command),
            remaining => {
                self.state = DecoderState::Collecting { command, remaining };
                None
            }
        }
    }

    fn collect(&mut self, byte: u8) -> Option<Frame> {
        let DecoderState::Collecting { command, remaining } = self.state else {
            return None;
        };
        self.buffer.put_u8(byte);

        match remaining {
            Remaining::UntilTerminator => None,
            Remaining::FixedCount(n) if n <= 1 => self.finish(command),
            Remaining::FixedCount(n) => {
                self.state = DecoderState::Collecting {
                    command,
                    remaining: Remaining::FixedCount(n - 1),
                };
                None
            }
        }
    }

    fn terminate(&mut self) -> Option<Frame> {
        let in_sysex = matches!(
            self.state,
            DecoderState::Collecting { command: START_SYSEX, .. }
        );
        self.state = DecoderState::Idle;
        if !in_sysex {
            self.buffer.clear();
            return None;
        }

        self.buffer.put_u8(END_SYSEX);
        let data = self.buffer.split().freeze();
        Frame::sysex(data)
    }

    fn finish(&mut self, command: u8) -> Option<Frame> {
        self.state = DecoderState::Idle;
        Some(Frame::command(command, self.buffer.split().freeze()))
    }
}
