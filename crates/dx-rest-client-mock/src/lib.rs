//! Mock host capabilities for exercising the Directus helpers offline

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use dx_api_contract::Credentials;
use dx_client_api::{
    ClientApiResult, CredentialStore, HttpRequest, HttpResponse, HttpTransport, TransportError,
};
use serde_json::Value;
use url::Url;

/// Transport that replays scripted responses in order and records every
/// request it receives
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push_response(HttpResponse::new(status, body.to_string()))
    }

    /// Queue a raw byte response
    pub fn push_bytes(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.push_response(HttpResponse::new(status, body))
    }

    pub fn push_response(&self, response: HttpResponse) -> &Self {
        self.lock_responses().push_back(Ok(response));
        self
    }

    /// Queue a connection-level failure carrying `message`
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        self.lock_responses().push_back(Err(message.into()));
        self
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// `METHOD /path` of each received request
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| {
                let path = Url::parse(&request.url)
                    .map(|url| url.path().to_string())
                    .unwrap_or_else(|_| request.url.clone());
                format!("{} {}", request.method, path)
            })
            .collect()
    }

    /// Number of scripted responses not consumed yet
    pub fn remaining(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<Result<HttpResponse, String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        let next = self.lock_responses().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::Connection(message)),
            None => Err(TransportError::Connection(format!(
                "no scripted response for {url}"
            ))),
        }
    }
}

/// Credential store backed by a map
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: HashMap<String, Credentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, credentials: Credentials) -> Self {
        self.records.insert(name.into(), credentials);
        self
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_credentials(&self, name: &str) -> ClientApiResult<Option<Credentials>> {
        Ok(self.records.get(name).cloned())
    }
}
