//! Buffering sender - collect data points, flush them in one round trip.
//!
//! A [`Sender`] accumulates [`DataPoint`]s in memory and pushes the
//! whole buffer through a fresh [`Session`] per flush. `send` does NOT
//! clear the buffer: a second flush retransmits everything collected so
//! far. Call [`Sender::clear`] between flushes when retransmission is
//! not wanted.
//!
//! # Example
//!
//! ```ignore
//! use zbx_client::Sender;
//!
//! let mut sender = Sender::new("zabbix.example.com", None);
//! sender.collect("web-01", "app.requests", 512, None);
//! sender.collect("web-01", "app.errors", 3, None);
//!
//! let result = sender.send()?;
//! println!("processed {:?} of {:?}", result.processed, result.total);
//! sender.clear();
//! ```

use serde_json::Value;

use crate::error::Result;
use crate::session::{now_unix, DataPoint, SenderResponse, Session};

/// Collects data points and flushes them to the trapper endpoint.
///
/// The buffer is exclusively owned and unsynchronized; share a sender
/// across threads behind your own lock if you must.
pub struct Sender {
    server: String,
    port: Option<u16>,
    buffer: Vec<DataPoint>,
    last_result: Option<SenderResponse>,
}

impl Sender {
    /// Create a sender targeting the given server.
    ///
    /// `port` defaults to 10051 at connect time.
    pub fn new(server: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            server: server.into(),
            port,
            buffer: Vec::new(),
            last_result: None,
        }
    }

    /// Append one data point to the buffer.
    ///
    /// `ts` defaults to the current Unix time. Values are not validated
    /// beyond being JSON-serializable.
    pub fn collect(
        &mut self,
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
        ts: Option<i64>,
    ) {
        let clock = ts.unwrap_or_else(now_unix);
        self.buffer.push(DataPoint::new(host, key, value, clock));
    }

    /// Flush the entire buffer through one session round trip.
    ///
    /// Opens a fresh connection, sends every buffered point, and closes
    /// the connection (guaranteed by session drop, error or not). The
    /// buffer is NOT cleared; see the module docs.
    pub fn send(&self) -> Result<SenderResponse> {
        tracing::debug!(
            "Flushing {} data points to {}",
            self.buffer.len(),
            self.server
        );
        let mut session = Session::connect(&self.server, self.port)?;
        session.send_data(&self.buffer, None)
    }

    /// Collect within a scope, then flush unconditionally.
    ///
    /// Runs the closure with this sender, then always invokes
    /// [`Sender::send`] when the closure finishes; the result is stored
    /// for [`Sender::last_result`] and returned. Network and parse
    /// errors propagate normally.
    pub fn run<F>(&mut self, collect: F) -> Result<SenderResponse>
    where
        F: FnOnce(&mut Sender),
    {
        collect(self);
        let result = self.send()?;
        self.last_result = Some(result.clone());
        Ok(result)
    }

    /// Result of the most recent [`Sender::run`] flush.
    pub fn last_result(&self) -> Option<&SenderResponse> {
        self.last_result.as_ref()
    }

    /// Drop all buffered data points.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Buffered data points, in collection order.
    pub fn points(&self) -> &[DataPoint] {
        &self.buffer
    }

    /// Number of buffered data points.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
