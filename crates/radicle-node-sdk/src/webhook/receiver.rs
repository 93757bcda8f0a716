//! Raw webhook request data.

use std::collections::HashMap;

use bytes::Bytes;

/// Header selecting the event type (`push` or `patch`).
pub const EVENT_TYPE_HEADER: &str = "x-radicle-event-type";

/// Header carrying the hex HMAC-SHA256 of the body.
pub const SIGNATURE_HEADER: &str = "x-radicle-signature";

/// Raw HTTP webhook request data.
///
/// Contains the headers and body from an incoming node webhook HTTP request.
/// Header names are matched case-insensitively.
///
/// # Examples
///
/// ```rust
/// use radicle_node_sdk::webhook::WebhookRequest;
/// use std::collections::HashMap;
///
/// let headers = HashMap::from([
///     ("X-Radicle-Event-Type".to_string(), "push".to_string()),
/// ]);
/// let request = WebhookRequest::new(headers, b"{}".to_vec().into());
/// assert_eq!(request.event_type(), Some("push"));
/// assert_eq!(request.signature(), None);
/// ```
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    body: Bytes,
}

impl WebhookRequest {
    /// Create a new webhook request. Header names are normalized to lowercase.
    pub fn new(headers: HashMap<String, String>, body: Bytes) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self { headers, body }
    }

    /// Get the event type from the `x-radicle-event-type` header.
    pub fn event_type(&self) -> Option<&str> {
        self.header(EVENT_TYPE_HEADER)
    }

    /// Get the signature from the `x-radicle-signature` header.
    pub fn signature(&self) -> Option<&str> {
        self.header(SIGNATURE_HEADER)
    }

    /// Get a header value by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Get the raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.body
    }

    /// Get all headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
