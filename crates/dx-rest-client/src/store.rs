//! Credential stores for hosts without their own configuration layer

use async_trait::async_trait;
use dx_api_contract::Credentials;
use dx_client_api::{ClientApiError, ClientApiResult, CredentialStore};
use serde_json::{Map, Value};

use crate::credentials::CREDENTIAL_NAME;

pub const URL_ENV_VAR: &str = "DIRECTUS_URL";
pub const ACCESS_TOKEN_ENV_VAR: &str = "DIRECTUS_ACCESS_TOKEN";

/// Reads Directus credentials from environment variables
#[derive(Debug, Clone)]
pub struct EnvCredentialStore {
    url_var: String,
    token_var: String,
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self::with_vars(URL_ENV_VAR, ACCESS_TOKEN_ENV_VAR)
    }
}

impl EnvCredentialStore {
    pub fn with_vars(url_var: impl Into<String>, token_var: impl Into<String>) -> Self {
        Self {
            url_var: url_var.into(),
            token_var: token_var.into(),
        }
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn get_credentials(&self, name: &str) -> ClientApiResult<Option<Credentials>> {
        if name != CREDENTIAL_NAME {
            return Ok(None);
        }
        let Ok(url) = std::env::var(&self.url_var) else {
            return Ok(None);
        };
        let access_token = std::env::var(&self.token_var)
            .ok()
            .filter(|token| !token.is_empty());
        Ok(Some(Credentials { url, access_token }))
    }
}

/// Credential records keyed by credential name, as kept in a host's JSON
/// configuration store
#[derive(Debug, Clone, Default)]
pub struct JsonCredentialStore {
    records: Map<String, Value>,
}

impl JsonCredentialStore {
    pub fn from_value(value: Value) -> ClientApiResult<Self> {
        match value {
            Value::Object(records) => Ok(Self { records }),
            other => Err(ClientApiError::Unexpected(format!(
                "credential store must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn from_json_str(json: &str) -> ClientApiResult<Self> {
        let value = serde_json::from_str(json)
            .map_err(|e| ClientApiError::Unexpected(format!("invalid credential store: {e}")))?;
        Self::from_value(value)
    }
}

#[async_trait]
impl CredentialStore for JsonCredentialStore {
    async fn get_credentials(&self, name: &str) -> ClientApiResult<Option<Credentials>> {
        self.records
            .get(name)
            .map(|record| {
                serde_json::from_value(record.clone()).map_err(|e| {
                    ClientApiError::Unexpected(format!("invalid {name} credentials: {e}"))
                })
            })
            .transpose()
    }
}
