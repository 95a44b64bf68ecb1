//! Directus node client
//!
//! This crate provides the Directus credential definition and the request
//! helpers a workflow node uses to call a Directus instance: generic JSON
//! calls, asset downloads wrapped into the host's binary envelope, and
//! multipart file creation and updates.

pub mod auth;
pub mod binary;
pub mod client;
pub mod credentials;
pub mod error;
pub mod request;
pub mod store;
pub mod transport;

pub use auth::*;
pub use binary::*;
pub use client::*;
pub use credentials::*;
pub use error::*;
pub use request::*;
pub use store::*;
pub use transport::*;

use async_trait::async_trait;
use dx_api_contract::*;
use dx_client_api::{ClientApiResult, DirectusApi};
use serde_json::Value;

#[async_trait]
impl DirectusApi for client::DirectusClient {
    async fn api_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
        query: &[(String, String)],
    ) -> ClientApiResult<Value> {
        self.api_request(method, path, body, query)
            .await
            .map_err(Into::into)
    }

    async fn asset_request(
        &self,
        method: HttpMethod,
        id: &str,
        data_property_name: &str,
        query: &[(String, String)],
    ) -> ClientApiResult<NodeExecutionData> {
        self.asset_request(method, id, data_property_name, query)
            .await
            .map_err(Into::into)
    }

    async fn file_request(
        &self,
        path: &str,
        changes: FileChanges,
        query: &[(String, String)],
    ) -> ClientApiResult<JsonObject> {
        self.file_request(path, changes, query)
            .await
            .map_err(Into::into)
    }
}
