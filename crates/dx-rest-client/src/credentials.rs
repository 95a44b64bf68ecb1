//! Directus API credential definition

use dx_api_contract::{CredentialProperty, CredentialPropertyType, Credentials, HttpMethod};
use dx_client_api::{ClientApiError, ClientApiResult, CredentialType, HttpRequest};

use crate::auth::BearerAuth;
use crate::request::RequestBuilder;

/// Name under which the host stores Directus credentials
pub const CREDENTIAL_NAME: &str = "directusApi";

/// Endpoint used for the optional connectivity check
pub const TEST_ENDPOINT: &str = "users/me";

/// Credential type for a Directus instance reached with a static token
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectusApiCredential;

impl CredentialType for DirectusApiCredential {
    fn name(&self) -> &'static str {
        CREDENTIAL_NAME
    }

    fn display_name(&self) -> &'static str {
        "Directus Api"
    }

    fn documentation_url(&self) -> &'static str {
        "directus"
    }

    fn properties(&self) -> Vec<CredentialProperty> {
        vec![
            CredentialProperty {
                display_name: "Directus Instance URL".into(),
                name: "url".into(),
                property_type: CredentialPropertyType::String,
                default: String::new(),
                placeholder: "https://my-directus-server or http://directus:8055 (for local docker compose container)".into(),
                description: "The complete URL of the host with which your Directus instance can be accessed".into(),
                required: true,
            },
            CredentialProperty {
                display_name: "Access Token".into(),
                name: "accessToken".into(),
                property_type: CredentialPropertyType::String,
                default: String::new(),
                placeholder: "fc529da1-cda4-430f-992c-8b40d145fad0".into(),
                description: "The Static Token of the user".into(),
                required: false,
            },
        ]
    }

    fn authenticate(
        &self,
        credentials: &Credentials,
        request: &mut HttpRequest,
    ) -> ClientApiResult<()> {
        BearerAuth::from_credentials(credentials)
            .apply_to_headers(&mut request.headers)
            .map_err(ClientApiError::from)
    }

    fn test_request(&self, credentials: &Credentials) -> Option<HttpRequest> {
        RequestBuilder::json(credentials, HttpMethod::Get, TEST_ENDPOINT)
            .build()
            .ok()
    }
}
