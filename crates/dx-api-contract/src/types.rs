//! Contract types for the Directus node

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::{ContractError, ContractResult};

/// Untyped JSON object, as exchanged with the workflow host
pub type JsonObject = serde_json::Map<String, Value>;

/// HTTP methods a workflow step may issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DELETE" => Ok(HttpMethod::Delete),
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "PATCH" => Ok(HttpMethod::Patch),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            _ => Err(ContractError::UnknownMethod(s.to_string())),
        }
    }
}

/// Credentials for one Directus instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Credentials {
    /// Base URL of the instance, e.g. `http://directus:8055`
    #[validate(length(min = 1, message = "Instance URL cannot be empty"))]
    pub url: String,
    /// Static token of the user; absent means unauthenticated requests
    #[serde(
        rename = "accessToken",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub access_token: Option<String>,
}

impl Credentials {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Instance URL with every trailing slash removed
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Token to place after `Bearer `; empty when none is configured
    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or("")
    }

    /// Check that the required fields are present
    pub fn check(&self) -> ContractResult<()> {
        self.validate()?;
        Ok(())
    }
}

/// Input widget type of a credential property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialPropertyType {
    String,
}

/// One configuration field shown to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProperty {
    pub display_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: CredentialPropertyType,
    pub default: String,
    pub placeholder: String,
    pub description: String,
    pub required: bool,
}

/// Standard Directus response wrapper: `{ "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// File metadata as returned by `/files/{id}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FileObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename_download: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FileObject {
    /// File id rendered for use in a URL path.
    ///
    /// Directus uses UUID strings, but numeric ids are accepted too.
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Binary envelope handed to the workflow host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    /// Base64 encoded content
    pub data: String,
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    pub file_size: u64,
}

/// One item of workflow output
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeExecutionData {
    pub json: JsonObject,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub binary: BTreeMap<String, BinaryData>,
}

/// File content part of a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: Option<String>,
}

impl FilePart {
    pub fn new(bytes: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Multipart payload for the files endpoint.
///
/// Directus reads text fields before the file part, so fields are kept in
/// insertion order and the transport writes them first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileForm {
    pub fields: Vec<(String, String)>,
    pub file: Option<FilePart>,
}

impl FileForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn with_file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    /// True when the form carries neither a file nor any field
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.fields.is_empty()
    }
}

/// What a file request should do
#[derive(Debug, Clone, PartialEq)]
pub enum FileChanges {
    /// Upload new content, then set extra metadata on the created file
    Create { form: FileForm, metadata: JsonObject },
    /// Replace content and/or patch metadata of existing files
    Update {
        form: Option<FileForm>,
        metadata: Option<JsonObject>,
    },
}

impl FileChanges {
    pub fn create(form: FileForm, metadata: JsonObject) -> Self {
        Self::Create { form, metadata }
    }

    /// Build an update, treating an empty form or empty metadata as absent
    pub fn update(form: FileForm, metadata: JsonObject) -> Self {
        Self::Update {
            form: (!form.is_empty()).then_some(form),
            metadata: (!metadata.is_empty()).then_some(metadata),
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            FileChanges::Create { .. } => HttpMethod::Post,
            FileChanges::Update { .. } => HttpMethod::Patch,
        }
    }
}
