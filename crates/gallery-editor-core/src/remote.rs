//! Contracts with the gallery upload and background-removal services.
//!
//! The crate never talks to the network. The host performs each request and
//! hands the outcome back as an [`UploadedImage`], raw bytes, or a
//! [`RemoteFailure`]. The validators here run the same checks the services
//! apply, before any bytes leave the browser.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EditorConfig;

/// Metadata of an image stored in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub id: String,
    pub filename: String,
    pub url: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Why a remote call was refused or failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteFailure {
    #[error("The file is empty")]
    EmptyFile,

    #[error("The file is {size} bytes, the maximum allowed is {limit} bytes")]
    Oversized { size: u64, limit: u64 },

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("The gallery already holds the maximum of {limit} images")]
    LimitReached { limit: usize },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("The processing service is unavailable, try again later")]
    ServiceUnavailable,

    #[error("Request failed: {0}")]
    Failed(String),
}

impl RemoteFailure {
    /// Map an HTTP error status and optional server message to a failure.
    ///
    /// `limit` is reported for 413 responses, which carry no size.
    pub fn from_status(status: u16, message: Option<&str>, limit: u64) -> Self {
        let message = message.map(str::trim).filter(|m| !m.is_empty());
        match status {
            400 => RemoteFailure::Rejected(message.unwrap_or("Bad request").to_string()),
            413 => RemoteFailure::Oversized { size: 0, limit },
            503 => RemoteFailure::ServiceUnavailable,
            other => RemoteFailure::Failed(
                message
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP status {other}")),
            ),
        }
    }
}

/// Check an image before it is uploaded to the gallery.
///
/// `existing_count` counts the images already stored, not including one the
/// upload will replace.
pub fn validate_upload(
    size: u64,
    mime: &str,
    existing_count: usize,
    config: &EditorConfig,
) -> Result<(), RemoteFailure> {
    if !config.allows_upload(mime) {
        return Err(RemoteFailure::UnsupportedType(mime.to_string()));
    }
    check_size(size, config.max_upload_bytes)?;
    if existing_count >= config.max_gallery_images {
        return Err(RemoteFailure::LimitReached {
            limit: config.max_gallery_images,
        });
    }
    Ok(())
}

/// Check an image before it is sent for background removal.
pub fn validate_background_removal(
    size: u64,
    mime: &str,
    config: &EditorConfig,
) -> Result<(), RemoteFailure> {
    check_size(size, config.max_upload_bytes)?;
    if !config.allows_background_removal(mime) {
        return Err(RemoteFailure::UnsupportedType(mime.to_string()));
    }
    Ok(())
}

fn check_size(size: u64, limit: u64) -> Result<(), RemoteFailure> {
    if size == 0 {
        return Err(RemoteFailure::EmptyFile);
    }
    if size > limit {
        return Err(RemoteFailure::Oversized { size, limit });
    }
    Ok(())
}
