//! Trapper session - one TCP connection, one round trip at a time.
//!
//! A [`Session`] owns its socket for its whole lifetime: connecting
//! constructs it, dropping it closes the connection on every exit path
//! (normal return, early return, error, unwind). Two typed operations
//! sit on top of the raw [`Session::request`] round trip:
//! [`Session::get_active_checks`] and [`Session::send_data`].
//!
//! # Example
//!
//! ```ignore
//! use zbx_client::Session;
//!
//! let mut session = Session::connect("zabbix.example.com", None)?;
//! let checks = session.get_active_checks("web-01")?;
//! for item in &checks.items {
//!     println!("{:?} every {:?}s", item.key, item.delay);
//! }
//! ```

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::codec::JsonCodec;
use crate::error::{Result, ZabbixError};
use crate::protocol::{pack_value, FrameBuffer, FrameHeader, DEFAULT_PORT, MAX_READ_SIZE};

/// One decoded request/response round trip.
///
/// Constructed fresh per request and not retained by the session.
#[derive(Debug, Clone)]
pub struct SessionResponse {
    /// Frame header of the response.
    pub header: FrameHeader,
    /// Decoded JSON payload.
    pub data: Value,
}

/// One monitored item descriptor from an active-checks query.
///
/// Fields the server leaves out decode to `None` rather than erroring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckItem {
    /// Item key, e.g. `agent.ping`.
    pub key: Option<String>,
    /// Polling interval in seconds.
    pub delay: Option<i64>,
    /// Last processed log size (log items).
    pub lastlogsize: Option<i64>,
    /// Last modification time (log items).
    pub mtime: Option<i64>,
}

/// Result of one active-checks round trip.
#[derive(Debug, Clone)]
pub struct CheckResponse {
    /// Frame header of the response.
    pub header: FrameHeader,
    /// Response status string, usually `"success"`.
    pub response: Option<String>,
    /// Raw decoded payload.
    pub data: Value,
    /// Items the queried host should report on, in server order.
    pub items: Vec<CheckItem>,
}

/// Result of one sender-data round trip.
///
/// The four numeric fields come from the free-text `info` summary; when
/// that string does not match the expected pattern they are all `None`.
#[derive(Debug, Clone)]
pub struct SenderResponse {
    /// Frame header of the response.
    pub header: FrameHeader,
    /// Response status string, usually `"success"`.
    pub response: Option<String>,
    /// Raw decoded payload.
    pub data: Value,
    /// Values the server accepted.
    pub processed: Option<u64>,
    /// Values the server rejected.
    pub failed: Option<u64>,
    /// Total values in the batch.
    pub total: Option<u64>,
    /// Server-side processing time in seconds.
    pub seconds_spent: Option<f64>,
}

/// One timestamped metric value, as buffered by the sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Host the value belongs to.
    pub host: String,
    /// Item key.
    pub key: String,
    /// The value itself; any JSON-serializable scalar.
    pub value: Value,
    /// Unix timestamp in seconds.
    pub clock: i64,
}

impl DataPoint {
    /// Create a data point with an explicit timestamp.
    pub fn new(
        host: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value>,
        clock: i64,
    ) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
            clock,
        }
    }
}

/// Current Unix time in seconds.
pub(crate) fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Parsed `info` summary counters.
struct InfoSummary {
    processed: u64,
    failed: u64,
    total: u64,
    seconds_spent: f64,
}

/// Parse the server's batch-ingestion summary string:
/// `processed: N; failed: N; total: N; seconds spent: F`.
///
/// Whitespace around the separators is tolerated. Returns `None` when
/// the string does not match; partial matches are not reported.
fn parse_info(info: &str) -> Option<InfoSummary> {
    let mut parts = info.splitn(4, ';');
    let processed: u64 = labeled_value(parts.next()?, "processed")?.parse().ok()?;
    let failed: u64 = labeled_value(parts.next()?, "failed")?.parse().ok()?;
    let total: u64 = labeled_value(parts.next()?, "total")?.parse().ok()?;

    // The summary ends with the duration; anything after the number is
    // not part of the match.
    let spent = labeled_value(parts.next()?, "seconds spent")?;
    let digits = spent
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(spent.len());
    let seconds_spent: f64 = spent[..digits].parse().ok()?;
    Some(InfoSummary {
        processed,
        failed,
        total,
        seconds_spent,
    })
}

/// Extract the value of a `label: value` segment.
fn labeled_value<'a>(segment: &'a str, label: &str) -> Option<&'a str> {
    let rest = segment.trim_start().strip_prefix(label)?;
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim())
}

/// A connected trapper session.
///
/// The session exclusively owns one TCP connection. Dropping the
/// session shuts the connection down, so the close is guaranteed even
/// when a request fails mid-call. Single-threaded, blocking I/O; one
/// in-flight request at a time.
pub struct Session {
    stream: TcpStream,
}

impl Session {
    /// Open a TCP connection to the trapper endpoint.
    ///
    /// `port` defaults to 10051.
    pub fn connect(server: &str, port: Option<u16>) -> Result<Session> {
        let port = port.unwrap_or(DEFAULT_PORT);
        tracing::debug!("Connecting to {}:{}", server, port);
        let stream = TcpStream::connect((server, port))?;
        Ok(Session { stream })
    }

    /// Access the underlying socket, e.g. to set read/write timeouts.
    ///
    /// The session itself imposes no timeouts.
    pub fn socket(&self) -> &TcpStream {
        &self.stream
    }

    /// Close the session. Equivalent to dropping it.
    pub fn close(self) {}

    /// Perform one request/response round trip.
    ///
    /// Encodes `value` as a frame, writes it fully, then reads in
    /// chunks until one complete frame has been assembled. A zero-byte
    /// read before any data arrived is [`ZabbixError::EmptyResponse`];
    /// EOF in the middle of a frame is [`ZabbixError::ConnectionClosed`].
    pub fn request<T: Serialize>(&mut self, value: &T) -> Result<SessionResponse> {
        let frame = pack_value(value)?;
        self.stream.write_all(&frame)?;

        let mut buffer = FrameBuffer::new();
        let mut chunk = [0u8; MAX_READ_SIZE];
        loop {
            let n = self.stream.read(&mut chunk)?;
            if n == 0 {
                return Err(if buffer.mid_frame() {
                    ZabbixError::ConnectionClosed
                } else {
                    ZabbixError::EmptyResponse
                });
            }

            if let Some(frame) = buffer.push(&chunk[..n])?.into_iter().next() {
                tracing::debug!("Received {} byte payload", frame.payload_len());
                let data: Value = JsonCodec::decode(frame.payload())?;
                return Ok(SessionResponse {
                    header: frame.header,
                    data,
                });
            }
        }
    }

    /// Query the set of items the given host should actively report on.
    ///
    /// Fails with [`ZabbixError::MissingField`] when the decoded
    /// payload carries no `"data"` key. Items with missing fields
    /// decode to `None` fields, not errors.
    pub fn get_active_checks(&mut self, host: &str) -> Result<CheckResponse> {
        let result = self.request(&json!({
            "request": "active checks",
            "host": host,
        }))?;
        let data = result.data;

        let raw_items = data.get("data").ok_or(ZabbixError::MissingField("data"))?;
        let items: Vec<CheckItem> = serde_json::from_value(raw_items.clone())?;

        Ok(CheckResponse {
            header: result.header,
            response: data.get("response").and_then(Value::as_str).map(String::from),
            items,
            data,
        })
    }

    /// Push a batch of data points to the server.
    ///
    /// `ts` is the batch clock, defaulting to the current Unix time.
    /// The server's `info` summary is parsed into the numeric fields of
    /// the response; a malformed summary leaves them `None` without
    /// failing the call.
    pub fn send_data(&mut self, points: &[DataPoint], ts: Option<i64>) -> Result<SenderResponse> {
        let clock = ts.unwrap_or_else(now_unix);
        let result = self.request(&json!({
            "request": "sender data",
            "data": points,
            "clock": clock,
        }))?;
        let data = result.data;

        let info = parse_info(data.get("info").and_then(Value::as_str).unwrap_or(""));

        Ok(SenderResponse {
            header: result.header,
            response: data.get("response").and_then(Value::as_str).map(String::from),
            processed: info.as_ref().map(|i| i.processed),
            failed: info.as_ref().map(|i| i.failed),
            total: info.as_ref().map(|i| i.total),
            seconds_spent: info.as_ref().map(|i| i.seconds_spent),
            data,
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info_full_match() {
        let info = parse_info("processed: 2; failed: 0; total: 2; seconds spent: 0.000123")
            .expect("info string should match");

        assert_eq!(info.processed, 2);
        assert_eq!(info.failed, 0);
        assert_eq!(info.total, 2);
        assert_eq!(info.seconds_spent, 0.000123);
    }

    #[test]
    fn test_parse_info_whitespace_tolerant() {
        let info = parse_info("processed:17;failed:  3 ;  total:20; seconds spent:   1.5")
            .expect("info string should match");

        assert_eq!(info.processed, 17);
        assert_eq!(info.failed, 3);
        assert_eq!(info.total, 20);
        assert_eq!(info.seconds_spent, 1.5);
    }

    #[test]
    fn test_parse_info_trailing_text_after_duration() {
        let info = parse_info("processed: 1; failed: 0; total: 1; seconds spent: 0.01 sec")
            .expect("trailing text after the duration is ignored");
        assert_eq!(info.seconds_spent, 0.01);
    }

    #[test]
    fn test_parse_info_no_match() {
        assert!(parse_info("").is_none());
        assert!(parse_info("invalid").is_none());
        assert!(parse_info("processed: 2; failed: 0").is_none());
        assert!(parse_info("processed: x; failed: 0; total: 2; seconds spent: 0.1").is_none());
    }

    #[test]
    fn test_check_item_missing_fields_decode_to_none() {
        let items: Vec<CheckItem> =
            serde_json::from_value(serde_json::json!([{"key": "agent.ping"}])).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key.as_deref(), Some("agent.ping"));
        assert_eq!(items[0].delay, None);
        assert_eq!(items[0].lastlogsize, None);
        assert_eq!(items[0].mtime, None);
    }

    #[test]
    fn test_check_item_full_decode() {
        let items: Vec<CheckItem> = serde_json::from_value(serde_json::json!([
            {"key": "agent.ping", "delay": 30, "lastlogsize": 0, "mtime": 0}
        ]))
        .unwrap();

        assert_eq!(
            items[0],
            CheckItem {
                key: Some("agent.ping".to_string()),
                delay: Some(30),
                lastlogsize: Some(0),
                mtime: Some(0),
            }
        );
    }

    #[test]
    fn test_data_point_serializes_with_wire_field_names() {
        let point = DataPoint::new("web-01", "app.requests", "512", 1000);
        let value = serde_json::to_value(&point).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "host": "web-01",
                "key": "app.requests",
                "value": "512",
                "clock": 1000,
            })
        );
    }

    #[test]
    fn test_now_unix_is_sane() {
        // 2020-01-01 as a floor
        assert!(now_unix() > 1_577_836_800);
    }
}
