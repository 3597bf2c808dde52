//! Length-prefixed frame codec for the hub connection
//!
//! All frames are laid out as:
//! ```text
//! [ 4 bytes: length (u32, big-endian) ][ 1 byte: frame kind ][ body ]
//! ```
//! where the length covers the kind byte and the body. Auth frames carry a
//! JSON body; telemetry frames carry the payload bytes verbatim.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum frame body size to prevent memory exhaustion
pub const MAX_FRAME_SIZE: u32 = 256 * 1024;

const KIND_AUTH: u8 = 1;
const KIND_AUTH_ACK: u8 = 2;
const KIND_TELEMETRY: u8 = 3;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum WireError {
    #[error("Frame too large: {0} bytes (max: {MAX_FRAME_SIZE})")]
    FrameTooLarge(usize),

    #[error("Invalid frame length prefix: {0}")]
    InvalidLength(u32),

    #[error("Unknown frame kind: {0}")]
    UnknownKind(u8),

    #[error("Malformed frame body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// Credentials presented by a device when the connection is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    pub device_id: String,
    pub key: String,
}

/// Hub verdict on an auth request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAck {
    pub accepted: bool,
    pub reason: String,
}

/// Frames exchanged with the hub
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Auth(AuthRequest),
    AuthAck(AuthAck),
    Telemetry(Bytes),
}

/// Encode a frame into a length-prefixed byte buffer
pub fn encode(frame: &Frame) -> Result<Bytes, WireError> {
    let (kind, body) = match frame {
        Frame::Auth(req) => (KIND_AUTH, Bytes::from(serde_json::to_vec(req)?)),
        Frame::AuthAck(ack) => (KIND_AUTH_ACK, Bytes::from(serde_json::to_vec(ack)?)),
        Frame::Telemetry(payload) => (KIND_TELEMETRY, payload.clone()),
    };

    if body.len() > MAX_FRAME_SIZE as usize {
        return Err(WireError::FrameTooLarge(body.len()));
    }

    let mut buf = BytesMut::with_capacity(5 + body.len());
    buf.put_u32(body.len() as u32 + 1);
    buf.put_u8(kind);
    buf.put_slice(&body);

    Ok(buf.freeze())
}

/// Try to decode one frame from the front of `buf`.
///
/// Returns `Ok(None)` when the buffer does not yet hold a complete frame;
/// in that case no bytes are consumed.
pub fn decode(buf: &mut BytesMut) -> Result<Option<Frame>, WireError> {
    if buf.len() < 4 {
        return Ok(None);
    }

    let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    if len == 0 || len > MAX_FRAME_SIZE + 1 {
        return Err(WireError::InvalidLength(len));
    }

    if buf.len() < 4 + len as usize {
        return Ok(None);
    }

    buf.advance(4);
    let kind = buf.get_u8();
    let body = buf.split_to(len as usize - 1).freeze();

    let frame = match kind {
        KIND_AUTH => Frame::Auth(serde_json::from_slice(&body)?),
        KIND_AUTH_ACK => Frame::AuthAck(serde_json::from_slice(&body)?),
        KIND_TELEMETRY => Frame::Telemetry(body),
        other => return Err(WireError::UnknownKind(other)),
    };

    Ok(Some(frame))
}

/// Incremental decoder for a stream of frames
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Append raw bytes read from the transport
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Decode the next complete frame, if any
    pub fn decode_next(&mut self) -> Result<Option<Frame>, WireError> {
        decode(&mut self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_frame() -> Frame {
        Frame::Auth(AuthRequest {
            device_id: "dev-001".into(),
            key: "secret".into(),
        })
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let original = auth_frame();

        let encoded = encode(&original).expect("encode failed");

        let len_prefix = u32::from_be_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]);
        assert_eq!(len_prefix as usize, encoded.len() - 4);

        let mut buf = BytesMut::from(&encoded[..]);
        let decoded = decode(&mut buf).expect("decode failed").expect("no frame");

        assert_eq!(decoded, original);
        assert!(buf.is_empty(), "buffer should be empty after decode");
    }

    #[test]
    fn test_telemetry_body_is_verbatim() {
        let payload = Bytes::from_static(b"{\"DeviceId\":\"dev-001\",\"Temperature\":31}");
        let encoded = encode(&Frame::Telemetry(payload.clone())).expect("encode failed");

        let mut buf = BytesMut::from(&encoded[..]);
        match decode(&mut buf).expect("decode failed").expect("no frame") {
            Frame::Telemetry(body) => assert_eq!(body, payload),
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_partial_decode() {
        let encoded = encode(&auth_frame()).expect("encode failed");

        let mut buf = BytesMut::from(&encoded[..5]);
        let result = decode(&mut buf).expect("decode should not fail on partial data");
        assert!(result.is_none(), "should return None for partial data");
        assert_eq!(buf.len(), 5, "partial data must not be consumed");
    }

    #[test]
    fn test_frame_decoder_chunked() {
        let encoded = encode(&auth_frame()).expect("encode failed");

        let mut decoder = FrameDecoder::new();
        decoder.extend(&encoded[..3]);
        assert!(decoder.decode_next().expect("decode error").is_none());

        decoder.extend(&encoded[3..]);
        let decoded = decoder
            .decode_next()
            .expect("decode error")
            .expect("should have frame");
        assert_eq!(decoded, auth_frame());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let payload = Bytes::from(vec![0u8; MAX_FRAME_SIZE as usize + 1]);
        let err = encode(&Frame::Telemetry(payload)).expect_err("oversized frame must fail");
        assert!(matches!(err, WireError::FrameTooLarge(_)));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u32(2);
        buf.put_u8(9);
        buf.put_u8(0);

        let err = decode(&mut buf).expect_err("unknown kind must fail");
        assert!(matches!(err, WireError::UnknownKind(9)));
    }

    #[test]
    fn test_zero_length_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u32(0);

        let err = decode(&mut buf).expect_err("zero-length frame must fail");
        assert!(matches!(err, WireError::InvalidLength(0)));
    }
}
