//! JSON codec using `serde_json`.
//!
//! Payloads are UTF-8 JSON text. serde_json leaves non-ASCII characters
//! unescaped, so hostnames and item keys in any script go over the wire
//! literally.

use crate::error::Result;

/// JSON codec for trapper payloads.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to UTF-8 JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode UTF-8 JSON bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid JSON for type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
