//! JSON-RPC management API client.
//!
//! A thin blocking client for the server's JSON-RPC 2.0 endpoint.
//! Every method is invoked through the explicit [`RpcClient::call`]
//! entry point by its dotted name (`"host.get"`, `"item.create"`, ...);
//! there is no reflective method synthesis.
//!
//! The `auth` token is omitted from request bodies until
//! [`RpcClient::login`] succeeds, then carried on every call. Request
//! ids are random and not correlated against the response; each call
//! has exactly one request in flight.
//!
//! # Example
//!
//! ```ignore
//! use zbx_client::RpcClient;
//! use serde_json::json;
//!
//! let mut client = RpcClient::new("http://zabbix.example.com/api_jsonrpc.php")?;
//! client.login("Admin", "secret")?;
//! let hosts = client.call("host.get", json!({"output": ["hostid", "host"]}))?;
//! ```

use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};

use crate::error::{Result, ZabbixError};

const JSONRPC_CONTENT_TYPE: &str = "application/json-rpc";
const CLIENT_USER_AGENT: &str = concat!("zbx-client/", env!("CARGO_PKG_VERSION"));

/// Blocking JSON-RPC client for the management API.
pub struct RpcClient {
    url: String,
    auth: Option<String>,
    http: Client,
}

impl RpcClient {
    /// Create a client for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().user_agent(CLIENT_USER_AGENT).build()?;
        Ok(Self {
            url: url.into(),
            auth: None,
            http,
        })
    }

    /// Check whether a login token is held.
    pub fn logged_in(&self) -> bool {
        self.auth.is_some()
    }

    /// Invoke an API method by its dotted name.
    ///
    /// Returns the response's `result` value. A server-reported error
    /// object is converted to [`ZabbixError::Api`] carrying the
    /// server's `error.data` detail.
    pub fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id: u32 = rand::rng().random_range(1..=65565);
        let body = self.build_body(method, params, id);

        tracing::debug!("POST {} method={} id={}", self.url, method, id);
        let content: Value = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, JSONRPC_CONTENT_TYPE)
            .json(&body)
            .send()?
            .json()?;

        match content.get("result") {
            Some(result) => Ok(result.clone()),
            None => Err(ZabbixError::Api(rpc_error_detail(&content))),
        }
    }

    /// Log in and store the returned auth token.
    ///
    /// A no-op when already logged in.
    pub fn login(&mut self, user: &str, password: &str) -> Result<()> {
        if self.logged_in() {
            return Ok(());
        }

        let result = self.call(
            "user.login",
            json!({
                "user": user,
                "password": password,
            }),
        )?;

        match result.as_str() {
            Some(token) => {
                self.auth = Some(token.to_string());
                Ok(())
            }
            None => Err(ZabbixError::Api(
                "user.login did not return a token".to_string(),
            )),
        }
    }

    /// Assemble one JSON-RPC 2.0 request body.
    fn build_body(&self, method: &str, params: Value, id: u32) -> Value {
        let mut body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });
        if let Some(auth) = &self.auth {
            body["auth"] = Value::String(auth.clone());
        }
        body
    }
}

/// Pull the most specific detail out of a failed RPC response.
fn rpc_error_detail(content: &Value) -> String {
    match content.get("error") {
        Some(err) => match err.get("data").and_then(Value::as_str) {
            Some(data) => data.to_string(),
            None => err.to_string(),
        },
        None => "response carried neither result nor error".to_string(),
    }
}
