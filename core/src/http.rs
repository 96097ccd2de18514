//! HTTP request/response values and the pure halves of a round trip.
//!
//! # Design
//! Requests and responses are plain data. `build_request` and
//! `decode_response` never touch the network; a `Transport` executes the
//! request in between. Keeping classification in `decode_response` means
//! every transport agrees on what counts as success, what "no content"
//! decodes to, and which text a failure carries.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

pub const CONTENT_TYPE: &str = "content-type";
pub const APPLICATION_JSON: &str = "application/json";
pub const NO_CONTENT: u16 = 204;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Build a JSON request for `path` relative to `base_url`.
///
/// The JSON content type always comes first; `extra_headers` are appended
/// after it, even when they repeat a name.
pub fn build_request<B: Serialize + ?Sized>(
    base_url: &str,
    method: HttpMethod,
    path: &str,
    body: Option<&B>,
    extra_headers: &[(String, String)],
) -> Result<HttpRequest, ApiError> {
    let body = body
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApiError::Serialization(e.to_string()))?;

    let mut headers = Vec::with_capacity(1 + extra_headers.len());
    headers.push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
    headers.extend(extra_headers.iter().cloned());

    Ok(HttpRequest {
        method,
        url: format!("{base_url}{path}"),
        headers,
        body,
    })
}

/// Classify a response and decode its body.
///
/// Returns `Ok(None)` for 204 without looking at the body.
pub fn decode_response<R: DeserializeOwned>(response: HttpResponse) -> Result<Option<R>, ApiError> {
    if !response.is_success() {
        let message = if response.body.is_empty() {
            reason_phrase(response.status)
        } else {
            response.body
        };
        return Err(ApiError::Status {
            status: response.status,
            message,
        });
    }
    if response.status == NO_CONTENT {
        return Ok(None);
    }
    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Canonical reason phrase for `status`, e.g. `Not Found`.
pub fn reason_phrase(status: u16) -> String {
    ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
