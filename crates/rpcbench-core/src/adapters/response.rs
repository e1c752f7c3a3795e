use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::BenchError;

/// Error label carried by every transport-level failure.
pub const NETWORK_ERROR: &str = "network";

/// Error label for a logical request the endpoint's transport cannot express.
pub const UNSUPPORTED_ERROR: &str = "unsupported";

/// Normalized outcome of one adapter call.
///
/// Every call produces one of these. Transport failures set `ok = false` and
/// `error = "network"` instead of returning `Err`.
#[derive(Debug, Clone, Serialize)]
pub struct AdapterResponse {
    pub ok: bool,
    /// HTTP status, `0` when no response was received.
    pub status: u16,
    /// Response headers with lowercase names.
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    /// Sanitized failure kind, kept for logs only.
    #[serde(skip)]
    pub detail: Option<&'static str>,
}

impl AdapterResponse {
    /// A response that never reached the provider (or never came back).
    #[must_use]
    pub fn network_failure(detail: &'static str) -> Self {
        Self {
            ok: false,
            status: 0,
            headers: BTreeMap::new(),
            body: Value::Null,
            error: Some(NETWORK_ERROR),
            detail: Some(detail),
        }
    }

    /// The logical request has no form on this transport. Nothing was sent.
    #[must_use]
    pub fn unsupported_request() -> Self {
        Self {
            ok: false,
            status: 0,
            headers: BTreeMap::new(),
            body: Value::Null,
            error: Some(UNSUPPORTED_ERROR),
            detail: None,
        }
    }

    /// A response received over HTTP. `ok` reflects only the status class.
    #[must_use]
    pub fn http(status: u16, headers: BTreeMap<String, String>, body: Value) -> Self {
        Self {
            ok: (200..300).contains(&status),
            status,
            headers,
            body,
            error: None,
            detail: None,
        }
    }

    #[must_use]
    pub fn is_network_failure(&self) -> bool {
        self.error == Some(NETWORK_ERROR)
    }

    /// Whether an HTTP response was received at all, regardless of status.
    #[must_use]
    pub fn received(&self) -> bool {
        self.status != 0
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// JSON-RPC `result`, when the envelope carries one and no `error`.
    #[must_use]
    pub fn rpc_result(&self) -> Option<&Value> {
        if self.body.get("error").is_some_and(|e| !e.is_null()) {
            return None;
        }
        self.body.get("result").filter(|r| !r.is_null())
    }

    /// Converts an unsuccessful response into the matching [`BenchError`].
    ///
    /// Used by pipelines that fail a whole scenario on the first failed call.
    #[must_use]
    pub fn to_error(&self) -> BenchError {
        if self.error == Some(UNSUPPORTED_ERROR) {
            return BenchError::InvalidResponse("request not supported by transport".to_string());
        }
        if self.is_network_failure() {
            return match self.detail {
                Some("connection timed out") => BenchError::Timeout,
                detail => BenchError::ConnectionFailed(
                    detail.unwrap_or(NETWORK_ERROR).to_string(),
                ),
            };
        }
        if !(200..300).contains(&self.status) {
            return BenchError::HttpError(self.status, summarize(&self.body));
        }
        if let Some(error) = self.body.get("error").filter(|e| !e.is_null()) {
            let code = error
                .get("code")
                .and_then(Value::as_i64)
                .and_then(|c| i32::try_from(c).ok())
                .unwrap_or(-32603);
            let message =
                error.get("message").and_then(Value::as_str).unwrap_or_default().to_string();
            return BenchError::RpcError(code, message);
        }
        BenchError::InvalidResponse(summarize(&self.body))
    }
}

/// Short body excerpt for error messages.
fn summarize(body: &Value) -> String {
    const MAX: usize = 256;
    let text = match body {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    if text.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
        format!("{}... (truncated)", &text[..cut])
    } else {
        text
    }
}
