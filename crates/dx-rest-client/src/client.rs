//! Directus request helpers

use std::sync::Arc;

use dx_api_contract::*;
use dx_client_api::{
    BinaryDataPreparer, CredentialStore, CredentialType, HttpRequest, HttpResponse, HttpTransport,
};
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::binary::Base64BinaryDataPreparer;
use crate::credentials::{DirectusApiCredential, CREDENTIAL_NAME};
use crate::error::{DirectusError, DirectusResult};
use crate::request::RequestBuilder;
use crate::transport::ReqwestTransport;

/// Endpoint holding file objects
pub const FILES_ENDPOINT: &str = "files";

/// Endpoint serving raw file content
pub const ASSETS_ENDPOINT: &str = "assets";

/// Capabilities supplied by the workflow host
#[derive(Clone)]
pub struct HostContext {
    pub credentials: Arc<dyn CredentialStore>,
    pub transport: Arc<dyn HttpTransport>,
    pub binary: Arc<dyn BinaryDataPreparer>,
}

impl HostContext {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        transport: Arc<dyn HttpTransport>,
        binary: Arc<dyn BinaryDataPreparer>,
    ) -> Self {
        Self {
            credentials,
            transport,
            binary,
        }
    }
}

/// Outcome of the advisory connectivity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityStatus {
    Ok,
    Failed(String),
}

/// Request helpers for one Directus node invocation
#[derive(Clone)]
pub struct DirectusClient {
    host: HostContext,
    credential: DirectusApiCredential,
}

impl DirectusClient {
    pub fn new(host: HostContext) -> Self {
        Self {
            host,
            credential: DirectusApiCredential,
        }
    }

    /// Client over the bundled reqwest transport and base64 envelope
    pub fn with_reqwest(credentials: Arc<dyn CredentialStore>) -> DirectusResult<Self> {
        Ok(Self::new(HostContext::new(
            credentials,
            Arc::new(ReqwestTransport::new()?),
            Arc::new(Base64BinaryDataPreparer),
        )))
    }

    pub fn credential(&self) -> &DirectusApiCredential {
        &self.credential
    }

    /// Perform a JSON call and return the response body unmodified
    pub async fn api_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: &[(String, String)],
    ) -> DirectusResult<Value> {
        self.api_request_with_headers(method, path, body, query, HeaderMap::new())
            .await
    }

    /// Same as [`Self::api_request`] with extra request headers
    pub async fn api_request_with_headers(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: &[(String, String)],
        headers: HeaderMap,
    ) -> DirectusResult<Value> {
        let credentials = self.resolve_credentials().await?;
        let request = RequestBuilder::json(&credentials, method, path)
            .body(body)
            .query(query)
            .headers(headers)
            .build()?;

        let response = self
            .http_request_with_authentication(&credentials, request)
            .await?;
        parse_json(&response)
    }

    /// Fetch a file's metadata and content and wrap them for the host
    pub async fn asset_request(
        &self,
        method: HttpMethod,
        id: &str,
        data_property_name: &str,
        query: &[(String, String)],
    ) -> DirectusResult<NodeExecutionData> {
        let credentials = self.resolve_credentials().await?;

        let metadata_request =
            RequestBuilder::json(&credentials, method, &format!("{FILES_ENDPOINT}/{id}"))
                .query(query)
                .build()?;
        let response = self
            .http_request_with_authentication(&credentials, metadata_request)
            .await?;
        let envelope: DataEnvelope<Value> =
            serde_json::from_slice(&response.body).map_err(DirectusError::malformed)?;
        let file: FileObject =
            serde_json::from_value(envelope.data.clone()).map_err(DirectusError::malformed)?;

        let asset_request =
            RequestBuilder::binary(&credentials, method, &format!("{ASSETS_ENDPOINT}/{id}"))
                .query(query)
                .build()?;
        let content = self
            .http_request_with_authentication(&credentials, asset_request)
            .await?
            .body;

        let envelope_data = self
            .host
            .binary
            .prepare_binary_data(
                content,
                file.filename_download.as_deref(),
                file.mime_type.as_deref(),
            )
            .await
            .map_err(|e| DirectusError::BinaryData(e.to_string()))?;

        let mut result = NodeExecutionData::default();
        result.json.insert("file".to_string(), envelope.data);
        result
            .binary
            .insert(data_property_name.to_string(), envelope_data);
        Ok(result)
    }

    /// Create a file, or update an existing file's content and/or metadata
    pub async fn file_request(
        &self,
        path: &str,
        changes: FileChanges,
        query: &[(String, String)],
    ) -> DirectusResult<JsonObject> {
        let mut result = JsonObject::new();

        match changes {
            FileChanges::Create { form, metadata } => {
                let created = self
                    .upload_form(HttpMethod::Post, path, form, query)
                    .await?;
                let id = serde_json::from_value::<FileObject>(Value::Object(created))
                    .map_err(DirectusError::malformed)?
                    .id_string()
                    .ok_or_else(|| DirectusError::malformed("created file has no id"))?;

                let updated = self
                    .api_request(
                        HttpMethod::Patch,
                        &format!("{FILES_ENDPOINT}/{id}"),
                        Some(Value::Object(metadata)),
                        &[],
                    )
                    .await?;
                merge_into(&mut result, updated);
            }
            FileChanges::Update { form, metadata } => {
                // Updates always target the files collection; `path` is only
                // used when creating.
                if let Some(form) = form {
                    let file = self
                        .upload_form(HttpMethod::Patch, FILES_ENDPOINT, form, query)
                        .await?;
                    result.extend(file);
                }
                if let Some(metadata) = metadata {
                    let updated = self
                        .api_request(
                            HttpMethod::Patch,
                            FILES_ENDPOINT,
                            Some(Value::Object(metadata)),
                            &[],
                        )
                        .await?;
                    merge_into(&mut result, updated);
                }
            }
        }

        Ok(result)
    }

    /// Method-driven entry point for hosts passing raw form and body values.
    ///
    /// `POST` creates, `PATCH` updates; an empty form or body counts as not
    /// supplied. Other methods perform no call and return an empty object.
    pub async fn file_request_raw(
        &self,
        method: HttpMethod,
        path: &str,
        form: FileForm,
        body: JsonObject,
        query: &[(String, String)],
    ) -> DirectusResult<JsonObject> {
        let changes = match method {
            HttpMethod::Post => FileChanges::create(form, body),
            HttpMethod::Patch => FileChanges::update(form, body),
            other => {
                debug!(method = %other, "file request ignored for unsupported method");
                return Ok(JsonObject::new());
            }
        };
        self.file_request(path, changes, query).await
    }

    /// Run the credential's test request; never fails the caller
    pub async fn check_connectivity(&self) -> ConnectivityStatus {
        let status = match self.try_connectivity().await {
            Ok(()) => ConnectivityStatus::Ok,
            Err(e) => ConnectivityStatus::Failed(e.to_string()),
        };
        if let ConnectivityStatus::Failed(reason) = &status {
            warn!(%reason, "Directus connectivity check failed");
        }
        status
    }

    async fn try_connectivity(&self) -> DirectusResult<()> {
        let credentials = self.resolve_credentials().await?;
        if let Some(request) = self.credential.test_request(&credentials) {
            self.http_request_with_authentication(&credentials, request)
                .await?;
        }
        Ok(())
    }

    // Private helper methods

    async fn resolve_credentials(&self) -> DirectusResult<Credentials> {
        let credentials = self
            .host
            .credentials
            .get_credentials(CREDENTIAL_NAME)
            .await
            .map_err(|e| DirectusError::CredentialStore(e.to_string()))?
            .ok_or_else(|| DirectusError::credentials_missing(CREDENTIAL_NAME))?;

        if credentials.check().is_err() {
            return Err(DirectusError::credentials_missing(CREDENTIAL_NAME));
        }
        Ok(credentials)
    }

    async fn upload_form(
        &self,
        method: HttpMethod,
        path: &str,
        form: FileForm,
        query: &[(String, String)],
    ) -> DirectusResult<JsonObject> {
        let credentials = self.resolve_credentials().await?;
        let request = RequestBuilder::multipart(&credentials, method, path, form)
            .query(query)
            .build()?;
        let response = self.http_request(request).await?;

        let envelope: DataEnvelope<JsonObject> =
            serde_json::from_slice(&response.body).map_err(DirectusError::malformed)?;
        Ok(envelope.data)
    }

    async fn http_request_with_authentication(
        &self,
        credentials: &Credentials,
        mut request: HttpRequest,
    ) -> DirectusResult<HttpResponse> {
        self.credential
            .authenticate(credentials, &mut request)
            .map_err(|e| DirectusError::RequestFailed(e.to_string()))?;
        self.http_request(request).await
    }

    async fn http_request(&self, request: HttpRequest) -> DirectusResult<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending Directus request");

        let response = self.host.transport.execute(request).await?;
        if !response.is_success() {
            return Err(DirectusError::RequestFailed(format!(
                "status {}: {}",
                response.status,
                response.text()
            )));
        }
        Ok(response)
    }
}

fn parse_json(response: &HttpResponse) -> DirectusResult<Value> {
    if response.body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(DirectusError::malformed)
}

/// Shallow merge of a response object's top-level keys
fn merge_into(target: &mut JsonObject, value: Value) {
    if let Value::Object(map) = value {
        target.extend(map);
    }
}
