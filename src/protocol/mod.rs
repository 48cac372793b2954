//! Protocol implementation module
//! 
//! This module defines the Firmata wire format: the byte-level frame decoder,
//! the outgoing message encoder, and the codec joining both to a byte stream.

pub mod codec;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod frame;
pub mod message;

pub use self::codec::FirmataCodec;
pub use self::constants::PinMode;
pub use self::decoder::{DecoderState, FrameDecoder, Remaining};
pub use self::encoder::{decode_u14, encode_u14, wrap_sysex};
pub use self::frame::Frame;
pub use self::message::Request;
