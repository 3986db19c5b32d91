//! Codec module - serialization/deserialization for payloads.
//!
//! The trapper protocol carries UTF-8 JSON payloads; [`JsonCodec`]
//! wraps serde_json behind the crate's error type.
//!
//! # Example
//!
//! ```
//! use zbx_client::codec::JsonCodec;
//!
//! let encoded = JsonCodec::encode(&"hello").unwrap();
//! let decoded: String = JsonCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, "hello");
//! ```

mod json;

pub use json::JsonCodec;
