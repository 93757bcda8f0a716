//! Session-bound client.
//!
//! [`SessionClient`] carries the node's session token (if any) and is the
//! type every API operation hangs off. Operations are defined next to their
//! wire types in the sibling modules via `impl SessionClient` blocks; this
//! module only owns the request plumbing and the uniform error mapping.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::client::RadicleClient;
use crate::error::ApiError;

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

/// Node API client bound to a session token.
#[derive(Clone)]
pub struct SessionClient {
    client: Arc<RadicleClient>,
    token: Option<String>,
}

impl SessionClient {
    pub(crate) fn new(client: Arc<RadicleClient>, token: Option<String>) -> Self {
        Self { client, token }
    }

    /// Whether requests from this client carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The parent client.
    pub fn client(&self) -> &RadicleClient {
        &self.client
    }

    /// GET a JSON resource. `path` holds raw, unencoded segments.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, query, None::<&()>).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request whose response body is irrelevant.
    pub(crate) async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        self.send(method, path, query, body).await.map(|_| ())
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = self.client.api_url(path)?;
        debug!(method = %method, path = %url.path(), "Sending node API request");

        let mut request = self.client.http_client().request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            // `json` also sets Content-Type: application/json
            request = request.json(body);
        }
        request = self.authorize(request);

        let response = request.send().await?;
        handle_response(response).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

// Security: don't expose the session token in debug output
impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("client", &self.client)
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

/// Map error statuses to [`ApiError::HttpError`].
///
/// Statuses >= 400 are errors. The message is read from the node's error body
/// when it can be decoded; an undecodable body falls back to the canonical
/// reason for the status.
async fn handle_response(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.as_u16() < 400 {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    debug!(status = status.as_u16(), message = %message, "Node reported an error");
    Err(ApiError::HttpError {
        status: status.as_u16(),
        message,
    })
}

/// Extract a message from the shapes of error body the node has used:
/// `{"error":{"message":".."}}`, `{"error":".."}` and `{"message":".."}`.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/error/message"),
        value.get("error"),
        value.get("message"),
    ];

    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .filter(|message| !message.is_empty())
        .map(str::to_string);
    message
}
