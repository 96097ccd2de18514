//! Request execution.
//!
//! # Design
//! `Transport` performs exactly one round trip and reports non-2xx statuses
//! as data; only a request that never produced a response is an error here.
//! `Http` glues the pure `build_request`/`decode_response` halves around a
//! transport, so swapping `UreqTransport` for a recording fake in tests
//! changes nothing about classification or decoding.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{build_request, decode_response, HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP request. No retries, no timeouts.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// The agent is configured so 4xx/5xx responses come back as data rather
/// than `Err`, letting `decode_response` interpret them.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Delete => {
                let mut builder = self.agent.delete(url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if request.method == HttpMethod::Post {
                    self.agent.post(url)
                } else {
                    self.agent.put(url)
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// JSON request executor bound to a base URL.
#[derive(Debug, Clone)]
pub struct Http<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> Http<T> {
    /// Trailing slashes on `base_url` are stripped so paths can start with `/`.
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build, send and decode one request. `Ok(None)` means 204 No Content.
    pub fn request<B, R>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
        headers: &[(String, String)],
    ) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = build_request(&self.base_url, method, path, body, headers)?;
        debug!(method = method.as_str(), url = %request.url, "sending request");

        let response = self.transport.send(&request).inspect_err(|e| {
            warn!(method = method.as_str(), url = %request.url, error = %e, "request did not complete");
        })?;
        debug!(status = response.status, url = %request.url, "received response");

        decode_response(response)
    }

    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>, ApiError> {
        self.request::<(), R>(HttpMethod::Get, path, None, &[])
    }

    pub fn post<B, R>(&self, path: &str, body: &B) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(HttpMethod::Post, path, Some(body), &[])
    }

    pub fn put<B, R>(&self, path: &str, body: &B) -> Result<Option<R>, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(HttpMethod::Put, path, Some(body), &[])
    }

    pub fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>, ApiError> {
        self.request::<(), R>(HttpMethod::Delete, path, None, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTransport;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let fake = FakeTransport::new();
        let http = Http::new("http://localhost:8080/", &fake);
        assert_eq!(http.base_url(), "http://localhost:8080");
    }

    #[test]
    fn get_sends_json_headers_against_base_url() {
        let fake = FakeTransport::new();
        fake.push_json(200, r#"{"ok":true}"#);
        let http = Http::new("http://localhost:8080", &fake);

        let value: Option<serde_json::Value> = http.get("/tickets").unwrap();
        assert_eq!(value, Some(serde_json::json!({"ok": true})));

        let sent = fake.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Get);
        assert_eq!(sent[0].url, "http://localhost:8080/tickets");
        assert_eq!(sent[0].header("content-type"), Some("application/json"));
    }

    #[test]
    fn post_serializes_body() {
        let fake = FakeTransport::new();
        fake.push_json(200, r#"{"ok":true}"#);
        let http = Http::new("http://h", &fake);

        let _: Option<serde_json::Value> = http.post("/tickets", &serde_json::json!({"title": "A"})).unwrap();
        let sent = fake.requests();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"title":"A"}"#));
    }

    #[test]
    fn non_success_surfaces_response_text() {
        let fake = FakeTransport::new();
        fake.push_text(400, "validation failed");
        let http = Http::new("http://h", &fake);

        let err = http.get::<serde_json::Value>("/tickets").unwrap_err();
        assert_eq!(err.to_string(), "validation failed");
    }

    #[test]
    fn delete_no_content_is_empty_result() {
        let fake = FakeTransport::new();
        fake.push_text(204, "");
        let http = Http::new("http://h", &fake);

        let result: Option<serde_json::Value> = http.delete("/tickets/1").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn network_failure_propagates_unchanged() {
        let fake = FakeTransport::new();
        fake.push_error(ApiError::Network("connection refused".to_string()));
        let http = Http::new("http://h", &fake);

        let err = http.get::<serde_json::Value>("/tickets").unwrap_err();
        assert!(matches!(err, ApiError::Network(ref msg) if msg == "connection refused"));
        assert_eq!(fake.requests().len(), 1);
    }
}
