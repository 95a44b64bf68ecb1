//! Transport-level request and response values

use async_trait::async_trait;
use dx_api_contract::{FileForm, HttpMethod};
use reqwest::header::HeaderMap;
use serde_json::Value;
use thiserror::Error;

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(FileForm),
}

/// How the caller wants the response body interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseEncoding {
    #[default]
    Json,
    /// Untyped byte buffer
    ArrayBuffer,
}

/// A fully formed request, built fresh for every call
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub response_encoding: ResponseEncoding,
}

/// Raw response as seen by the transport
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Errors raised by a transport before any response was received
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Connection(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// HTTP transport supplied by the host.
///
/// Implementations return every response, whatever its status; deciding
/// what counts as success is left to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(404, "not found").is_success());
    }

    #[test]
    fn test_text_is_lossy() {
        let response = HttpResponse::new(200, vec![b'o', b'k', 0xff]);
        assert_eq!(response.text(), "ok\u{fffd}");
    }
}
