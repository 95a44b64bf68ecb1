//! Shared request builder
//!
//! Every helper goes through [`RequestBuilder`], so URL normalization and the
//! fixed header set live in one place.

use dx_api_contract::{Credentials, FileForm, HttpMethod};
use dx_client_api::{HttpRequest, RequestBody, ResponseEncoding};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;

use crate::auth::BearerAuth;
use crate::error::DirectusResult;

/// User agent sent with every request
pub const DIRECTUS_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:104.0) Gecko/20100101 Firefox/104.0";

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Join an instance URL and a relative path with exactly one slash
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Builds one [`HttpRequest`] against the configured instance
#[derive(Debug, Clone)]
pub struct RequestBuilder<'a> {
    credentials: &'a Credentials,
    method: HttpMethod,
    path: String,
    content_type: &'static str,
    body: RequestBody,
    query: Vec<(String, String)>,
    extra_headers: HeaderMap,
    response_encoding: ResponseEncoding,
}

impl<'a> RequestBuilder<'a> {
    fn new(credentials: &'a Credentials, method: HttpMethod, path: &str) -> Self {
        Self {
            credentials,
            method,
            path: path.to_string(),
            content_type: JSON_CONTENT_TYPE,
            body: RequestBody::Empty,
            query: Vec::new(),
            extra_headers: HeaderMap::new(),
            response_encoding: ResponseEncoding::Json,
        }
    }

    /// JSON request whose response is parsed as JSON
    pub fn json(credentials: &'a Credentials, method: HttpMethod, path: &str) -> Self {
        Self::new(credentials, method, path)
    }

    /// Request whose response is kept as an untyped byte buffer
    pub fn binary(credentials: &'a Credentials, method: HttpMethod, path: &str) -> Self {
        let mut builder = Self::new(credentials, method, path);
        builder.response_encoding = ResponseEncoding::ArrayBuffer;
        builder
    }

    /// Multipart upload carrying `form`
    pub fn multipart(
        credentials: &'a Credentials,
        method: HttpMethod,
        path: &str,
        form: FileForm,
    ) -> Self {
        let mut builder = Self::new(credentials, method, path);
        builder.content_type = MULTIPART_CONTENT_TYPE;
        builder.body = RequestBody::Multipart(form);
        builder
    }

    /// Set a JSON body; `None` leaves the request without one
    pub fn body(mut self, body: Option<Value>) -> Self {
        if let Some(body) = body {
            self.body = RequestBody::Json(body);
        }
        self
    }

    pub fn query(mut self, query: &[(String, String)]) -> Self {
        self.query.extend_from_slice(query);
        self
    }

    /// Extra headers; they cannot override content type, user agent or
    /// authorization
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    pub fn build(self) -> DirectusResult<HttpRequest> {
        let mut headers = self.extra_headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        headers.insert(USER_AGENT, HeaderValue::from_static(DIRECTUS_USER_AGENT));
        BearerAuth::from_credentials(self.credentials).apply_to_headers(&mut headers)?;

        Ok(HttpRequest {
            method: self.method,
            url: join_url(self.credentials.base_url(), &self.path),
            headers,
            query: self.query,
            body: self.body,
            response_encoding: self.response_encoding,
        })
    }
}
