//! Binary envelope preparation

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use dx_api_contract::BinaryData;
use dx_client_api::{BinaryDataPreparer, ClientApiResult};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Encodes content as standard base64 inside a [`BinaryData`] envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64BinaryDataPreparer;

#[async_trait]
impl BinaryDataPreparer for Base64BinaryDataPreparer {
    async fn prepare_binary_data(
        &self,
        bytes: Vec<u8>,
        file_name: Option<&str>,
        mime_type: Option<&str>,
    ) -> ClientApiResult<BinaryData> {
        let file_extension = file_name
            .and_then(|name| Path::new(name).extension())
            .map(|ext| ext.to_string_lossy().to_lowercase());

        Ok(BinaryData {
            data: base64::engine::general_purpose::STANDARD.encode(&bytes),
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_MIME_TYPE)
                .to_string(),
            file_name: file_name.map(str::to_string),
            file_extension,
            file_size: bytes.len() as u64,
        })
    }
}
