//! # zbx-client
//!
//! Rust client for the Zabbix monitoring server's two network-facing
//! APIs.
//!
//! ## Architecture
//!
//! - **Trapper protocol** (raw TCP, default port 10051): binary frames
//!   of a 13-byte `ZBXD` header plus a JSON payload. [`Session`] does
//!   one request/response round trip per call; [`Sender`] buffers data
//!   points and flushes them through a session.
//! - **JSON-RPC API** (HTTP POST): [`RpcClient`] invokes management
//!   methods by dotted name via an explicit `call` entry point.
//!
//! ## Example
//!
//! ```ignore
//! use zbx_client::Sender;
//!
//! fn main() -> zbx_client::Result<()> {
//!     let mut sender = Sender::new("zabbix.example.com", None);
//!     sender.collect("web-01", "app.requests", 512, None);
//!     sender.collect("web-01", "app.errors", 3, None);
//!
//!     let result = sender.send()?;
//!     println!("processed: {:?}", result.processed);
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod protocol;

mod api;
mod sender;
mod session;

pub use api::RpcClient;
pub use error::{Result, ZabbixError};
pub use sender::Sender;
pub use session::{
    CheckItem, CheckResponse, DataPoint, SenderResponse, Session, SessionResponse,
};
