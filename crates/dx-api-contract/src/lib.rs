//! Directus node contract types
//!
//! This crate defines the plain data exchanged between the workflow host and
//! the Directus request helpers: credentials and their configuration schema,
//! file metadata, the binary envelope handed back to the host, and the typed
//! multipart payloads used for file uploads.

pub mod error;
pub mod json;
pub mod types;

pub use error::*;
pub use json::*;
pub use types::*;
