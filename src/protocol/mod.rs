//! Trapper wire protocol: header layout, frames, and frame assembly.
//!
//! Every trapper message is a 13-byte header (`ZBXD` magic, version
//! byte, Little Endian u64 payload length) followed by a UTF-8 JSON
//! payload. [`FrameHeader`] covers the header layout, [`Frame`] pairs a
//! header with its payload, and [`FrameBuffer`] assembles frames from
//! fragmented socket reads.

mod frame;
mod frame_buffer;
mod wire_format;

pub use frame::{build_frame, pack_value, unpack_value, Frame};
pub use frame_buffer::FrameBuffer;
pub use wire_format::{
    FrameHeader, DEFAULT_MAX_PAYLOAD_SIZE, DEFAULT_PORT, HEADER_SIZE, MAGIC, MAX_READ_SIZE,
    PROTOCOL_VERSION,
};
