//! Wire format encoding and decoding.
//!
//! Implements the 13-byte trapper header:
//! ```text
//! ┌──────────┬─────────┬────────────┐
//! │ Magic    │ Version │ Length     │
//! │ 4 bytes  │ 1 byte  │ 8 bytes    │
//! │ "ZBXD"   │ u8 (=1) │ uint64 LE  │
//! └──────────┴─────────┴────────────┘
//! ```
//!
//! The length field is Little Endian and gives the byte length of the
//! UTF-8 JSON payload that immediately follows the header.

use crate::error::{Result, ZabbixError};

/// Magic bytes at the start of every frame.
pub const MAGIC: [u8; 4] = *b"ZBXD";

/// Protocol version carried in every header.
pub const PROTOCOL_VERSION: u8 = 1;

/// Header size in bytes (fixed, exactly 13).
pub const HEADER_SIZE: usize = 13;

/// Default TCP port of the trapper endpoint.
pub const DEFAULT_PORT: u16 = 10051;

/// Maximum bytes requested per socket read.
pub const MAX_READ_SIZE: usize = 65535;

/// Default maximum payload size (128 MB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: u64 = 128 * 1024 * 1024;

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Protocol version (currently always 1).
    pub version: u8,
    /// Payload length in bytes.
    pub length: u64,
}

impl FrameHeader {
    /// Create a header for a payload of the given byte length.
    pub fn new(length: u64) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            length,
        }
    }

    /// Encode header to bytes (magic + version + Little Endian length).
    ///
    /// # Example
    ///
    /// ```
    /// use zbx_client::protocol::FrameHeader;
    ///
    /// let header = FrameHeader::new(100);
    /// let bytes = header.encode();
    /// assert_eq!(bytes.len(), 13);
    /// assert_eq!(&bytes[..4], b"ZBXD");
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (13 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= HEADER_SIZE);
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4] = self.version;
        buf[5..13].copy_from_slice(&self.length.to_le_bytes());
    }

    /// Decode header from bytes.
    ///
    /// Fails with [`ZabbixError::Format`] if fewer than 13 bytes are
    /// available or the magic does not match `ZBXD`.
    ///
    /// # Example
    ///
    /// ```
    /// use zbx_client::protocol::FrameHeader;
    ///
    /// let mut bytes = b"ZBXD\x01".to_vec();
    /// bytes.extend_from_slice(&100u64.to_le_bytes());
    /// let header = FrameHeader::decode(&bytes).unwrap();
    /// assert_eq!(header.version, 1);
    /// assert_eq!(header.length, 100);
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(ZabbixError::Format(format!(
                "Header needs {} bytes, got {}",
                HEADER_SIZE,
                buf.len()
            )));
        }
        if buf[0..4] != MAGIC {
            return Err(ZabbixError::Format(format!(
                "Bad magic: expected {:?}, got {:?}",
                MAGIC,
                &buf[0..4]
            )));
        }
        Ok(Self {
            version: buf[4],
            length: u64::from_le_bytes([
                buf[5], buf[6], buf[7], buf[8], buf[9], buf[10], buf[11], buf[12],
            ]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_encode_decode_roundtrip() {
        let original = FrameHeader::new(100);
        let encoded = original.encode();
        let decoded = FrameHeader::decode(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_header_little_endian_byte_order() {
        let header = FrameHeader::new(0x0102030405060708);
        let bytes = header.encode();

        assert_eq!(&bytes[0..4], b"ZBXD");
        assert_eq!(bytes[4], PROTOCOL_VERSION);

        // Length: 0x0102030405060708 in LE, least significant byte first
        assert_eq!(bytes[5], 0x08);
        assert_eq!(bytes[6], 0x07);
        assert_eq!(bytes[7], 0x06);
        assert_eq!(bytes[8], 0x05);
        assert_eq!(bytes[9], 0x04);
        assert_eq!(bytes[10], 0x03);
        assert_eq!(bytes[11], 0x02);
        assert_eq!(bytes[12], 0x01);
    }

    #[test]
    fn test_header_size_is_exactly_13() {
        assert_eq!(HEADER_SIZE, 13);
        let header = FrameHeader::new(0);
        assert_eq!(header.encode().len(), 13);
    }

    #[test]
    fn test_decode_too_short_buffer() {
        let buf = [0u8; 12]; // One byte short
        let result = FrameHeader::decode(&buf);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("13 bytes"));
    }

    #[test]
    fn test_decode_bad_magic_rejected() {
        let mut bytes = b"XBZD\x01".to_vec();
        bytes.extend_from_slice(&0u64.to_le_bytes());
        let result = FrameHeader::decode(&bytes);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Bad magic"));
    }

    #[test]
    fn test_encode_into() {
        let header = FrameHeader::new(42);
        let mut buf = [0u8; HEADER_SIZE];
        header.encode_into(&mut buf);

        let decoded = FrameHeader::decode(&buf).unwrap();
        assert_eq!(header, decoded);
    }

    #[test]
    fn test_zero_length_payload() {
        let header = FrameHeader::new(0);
        let decoded = FrameHeader::decode(&header.encode()).unwrap();
        assert_eq!(decoded.length, 0);
    }
}
