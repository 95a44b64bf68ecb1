//! reqwest-backed HTTP transport

use async_trait::async_trait;
use dx_api_contract::FileForm;
use dx_client_api::{HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportError};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Method};
use url::Url;

use crate::error::{DirectusError, DirectusResult};

/// Transport that performs requests with `reqwest`.
///
/// No timeout is configured here; the client's defaults apply.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
}

impl ReqwestTransport {
    pub fn new() -> DirectusResult<Self> {
        let http_client = HttpClient::builder()
            .build()
            .map_err(|e| DirectusError::RequestFailed(e.to_string()))?;
        Ok(Self { http_client })
    }

    /// Use an already configured client (proxies, TLS roots, timeouts)
    pub fn with_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidRequest(format!("{}: {}", request.url, e)))?;
        let method = Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut headers = request.headers;
        if matches!(request.body, RequestBody::Multipart(_)) {
            // reqwest writes the boundary-carrying content type itself
            headers.remove(CONTENT_TYPE);
        }

        let mut builder = self.http_client.request(method, url).headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => builder.multipart(multipart_form(form)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn multipart_form(form: FileForm) -> Result<Form, TransportError> {
    let mut multipart = Form::new();
    for (name, value) in form.fields {
        multipart = multipart.text(name, value);
    }
    if let Some(file) = form.file {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(mime_type) = file.mime_type {
            part = part
                .mime_str(&mime_type)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        }
        multipart = multipart.part("file", part);
    }
    Ok(multipart)
}
