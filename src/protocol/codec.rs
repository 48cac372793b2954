use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::core::Error;
use super::decoder::FrameDecoder;
use super::frame::Frame;
use super::message::Request;

/// Firmata codec for `FramedRead`/`FramedWrite`
///
/// Decoding consumes the source buffer byte by byte, so a partial frame lives
/// in the inner [`FrameDecoder`] rather than in the read buffer.
#[derive(Debug, Default)]
pub struct FirmataCodec {
    decoder: FrameDecoder,
}

impl FirmataCodec {
    /// Creates a new codec
    pub fn new() -> Self {
        FirmataCodec::default()
    }
}

impl Decoder for FirmataCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        while src.has_remaining() {
            let byte = src.get_u8();
            if let Some(frame) = self.decoder.feed(byte) {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}

impl Encoder<Request> for FirmataCodec {
    type Error = Error;

    fn encode(&mut self, item: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item.to_bytes());
        Ok(())
    }
}
