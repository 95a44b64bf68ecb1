//! Bearer authentication for Directus requests

use dx_api_contract::Credentials;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::error::DirectusResult;

/// Static-token bearer authentication.
///
/// An empty token still produces the header, as `Bearer ` with nothing after
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::new(credentials.bearer_token())
    }

    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Set the `Authorization` header, replacing any previous value
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> DirectusResult<()> {
        let mut value = HeaderValue::from_str(&self.header_value())?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}
