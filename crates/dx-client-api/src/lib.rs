//! Host capability and operation traits for the Directus node
//!
//! The workflow host supplies credential storage, an HTTP transport and a
//! binary-data utility; the request helpers only see them through the traits
//! defined here.

pub mod transport;

pub use transport::*;

use async_trait::async_trait;
use dx_api_contract::*;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientApiError {
    #[error("no credentials configured for {0}")]
    CredentialsMissing(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("unexpected: {0}")]
    Unexpected(String),
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

/// Credential lookup provided by the host's configuration store
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve the credential record stored under `name`
    async fn get_credentials(&self, name: &str) -> ClientApiResult<Option<Credentials>>;
}

/// Wraps raw bytes into the host's binary envelope
#[async_trait]
pub trait BinaryDataPreparer: Send + Sync {
    async fn prepare_binary_data(
        &self,
        bytes: Vec<u8>,
        file_name: Option<&str>,
        mime_type: Option<&str>,
    ) -> ClientApiResult<BinaryData>;
}

/// A credential definition: its configuration schema and how it
/// authenticates outgoing requests
pub trait CredentialType: Send + Sync {
    fn name(&self) -> &'static str;
    fn display_name(&self) -> &'static str;
    fn documentation_url(&self) -> &'static str;
    fn properties(&self) -> Vec<CredentialProperty>;

    /// Apply the authentication rule to a request about to be sent
    fn authenticate(
        &self,
        credentials: &Credentials,
        request: &mut HttpRequest,
    ) -> ClientApiResult<()>;

    /// Optional request used to check that the credentials work
    fn test_request(&self, _credentials: &Credentials) -> Option<HttpRequest> {
        None
    }
}

/// Operations the Directus node exposes to the workflow host
#[async_trait]
pub trait DirectusApi: Send + Sync {
    async fn api_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: &[(String, String)],
    ) -> ClientApiResult<Value>;

    async fn asset_request(
        &self,
        method: HttpMethod,
        id: &str,
        data_property_name: &str,
        query: &[(String, String)],
    ) -> ClientApiResult<NodeExecutionData>;

    async fn file_request(
        &self,
        path: &str,
        changes: FileChanges,
        query: &[(String, String)],
    ) -> ClientApiResult<JsonObject>;
}
