//! Frame struct and pack/unpack helpers.
//!
//! A frame is the 13-byte header followed by a UTF-8 JSON payload.
//! Uses `bytes::Bytes` for cheap payload sharing.
//!
//! # Example
//!
//! ```
//! use zbx_client::protocol::{pack_value, unpack_value};
//! use serde_json::json;
//!
//! let bytes = pack_value(&json!({"request": "active checks"})).unwrap();
//! let (header, value) = unpack_value(&bytes).unwrap();
//! assert_eq!(header.length as usize, bytes.len() - 13);
//! assert_eq!(value["request"], "active checks");
//! ```

use bytes::Bytes;
use serde_json::Value;

use super::wire_format::{FrameHeader, HEADER_SIZE};
use crate::codec::JsonCodec;
use crate::error::Result;

/// A complete protocol frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Decoded header.
    pub header: FrameHeader,
    /// Payload bytes (zero-copy via `bytes::Bytes`).
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame from header and payload.
    pub fn new(header: FrameHeader, payload: Bytes) -> Self {
        Self { header, payload }
    }

    /// Get a reference to the payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the payload length.
    #[inline]
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Build a complete frame as a single byte vector.
///
/// Encodes the header and appends the payload into a contiguous buffer.
pub fn build_frame(header: &FrameHeader, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(payload);
    buf
}

/// Serialize a value to JSON and wrap it in a frame.
///
/// Non-ASCII characters pass through literally; the header's length
/// field is the exact byte count of the encoded payload.
pub fn pack_value<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    let payload = JsonCodec::encode(value)?;
    let header = FrameHeader::new(payload.len() as u64);
    Ok(build_frame(&header, &payload))
}

/// Decode a frame from a byte buffer.
///
/// Reads the 13-byte header, then up to `header.length` payload bytes.
/// If fewer payload bytes are present than the header declares, the
/// available bytes are used as-is; truncated JSON then surfaces as a
/// parse error. For assembling frames from a socket, prefer
/// [`FrameBuffer`](super::FrameBuffer), which waits for the full
/// payload instead.
pub fn unpack_value(bytes: &[u8]) -> Result<(FrameHeader, Value)> {
    let header = FrameHeader::decode(bytes)?;
    let end = HEADER_SIZE + (header.length as usize).min(bytes.len() - HEADER_SIZE);
    let value = JsonCodec::decode(&bytes[HEADER_SIZE..end])?;
    Ok((header, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_frame_creation() {
        let header = FrameHeader::new(5);
        let payload = Bytes::from_static(b"hello");
        let frame = Frame::new(header, payload);

        assert_eq!(frame.header.length, 5);
        assert_eq!(frame.payload(), b"hello");
        assert_eq!(frame.payload_len(), 5);
    }

    #[test]
    fn test_build_frame() {
        let header = FrameHeader::new(5);
        let bytes = build_frame(&header, b"hello");

        assert_eq!(bytes.len(), HEADER_SIZE + 5);

        let parsed = FrameHeader::decode(&bytes[..HEADER_SIZE]).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(&bytes[HEADER_SIZE..], b"hello");
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let value = json!({"request": "sender data", "clock": 1000});
        let bytes = pack_value(&value).unwrap();

        let (header, decoded) = unpack_value(&bytes).unwrap();
        assert_eq!(header.length as usize, bytes.len() - HEADER_SIZE);
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_pack_non_ascii_passes_through() {
        let value = json!({"host": "сервер-01", "key": "温度"});
        let bytes = pack_value(&value).unwrap();

        // Payload is literal UTF-8, not \u-escaped ASCII
        let payload = &bytes[HEADER_SIZE..];
        let text = std::str::from_utf8(payload).unwrap();
        assert!(text.contains("сервер-01"));
        assert!(text.contains("温度"));

        let (header, decoded) = unpack_value(&bytes).unwrap();
        assert_eq!(header.length as usize, payload.len());
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_unpack_truncated_payload_is_parse_error() {
        let bytes = pack_value(&json!({"response": "success"})).unwrap();
        // Header declares the full length but half the payload is missing
        let cut = HEADER_SIZE + (bytes.len() - HEADER_SIZE) / 2;
        let result = unpack_value(&bytes[..cut]);
        assert!(matches!(
            result,
            Err(crate::error::ZabbixError::Json(_))
        ));
    }

    #[test]
    fn test_unpack_bad_magic() {
        let mut bytes = pack_value(&json!({})).unwrap();
        bytes[0] = b'X';
        assert!(unpack_value(&bytes).is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pack_unpack_roundtrip_for_arbitrary_text(host in ".*", key in ".*") {
                // Property: any JSON-serializable value, including
                // non-ASCII text, survives a pack/unpack cycle and the
                // header length matches the payload byte count.
                let value = json!({"host": host, "key": key});
                let bytes = pack_value(&value).unwrap();

                let (header, decoded) = unpack_value(&bytes).unwrap();
                prop_assert_eq!(header.length as usize, bytes.len() - HEADER_SIZE);
                prop_assert_eq!(decoded, value);
            }
        }
    }
}
