//! Editor limits and export defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::EncodeOptions;

/// Upload size limit shared by the gallery and background removal (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Maximum number of images a gallery can hold.
pub const DEFAULT_MAX_GALLERY_IMAGES: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid editor config JSON: {0}")]
    Parse(String),

    #[error("{field} must be greater than zero")]
    ZeroLimit { field: &'static str },

    #[error("{field} must list at least one MIME type")]
    NoAllowedTypes { field: &'static str },

    #[error("Export quality must be between 0.0 and 1.0, got {0}")]
    QualityOutOfRange(f32),
}

/// Editor configuration.
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub max_upload_bytes: u64,
    pub max_gallery_images: usize,
    /// MIME types the gallery accepts for upload
    pub upload_types: Vec<String>,
    /// MIME types the background-removal service accepts
    pub background_removal_types: Vec<String>,
    /// Format used when saving back to the gallery
    pub export: EncodeOptions,
    pub download_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let upload_types: Vec<String> = ["image/png", "image/jpeg", "image/jpg"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut background_removal_types = upload_types.clone();
        background_removal_types.extend(["image/webp".to_string(), "image/bmp".to_string()]);

        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_gallery_images: DEFAULT_MAX_GALLERY_IMAGES,
            upload_types,
            background_removal_types,
            export: EncodeOptions::default(),
            download_prefix: "edited_".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "maxUploadBytes",
            });
        }
        if self.max_gallery_images == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "maxGalleryImages",
            });
        }
        if self.upload_types.is_empty() {
            return Err(ConfigError::NoAllowedTypes {
                field: "uploadTypes",
            });
        }
        if self.background_removal_types.is_empty() {
            return Err(ConfigError::NoAllowedTypes {
                field: "backgroundRemovalTypes",
            });
        }
        let quality = self.export.quality;
        if !(0.0..=1.0).contains(&quality) {
            return Err(ConfigError::QualityOutOfRange(quality));
        }
        Ok(())
    }

    /// Whether `mime` may be uploaded to the gallery.
    pub fn allows_upload(&self, mime: &str) -> bool {
        contains_mime(&self.upload_types, mime)
    }

    /// Whether `mime` may be sent for background removal.
    pub fn allows_background_removal(&self, mime: &str) -> bool {
        contains_mime(&self.background_removal_types, mime)
    }

    /// Name offered when the edited image is downloaded.
    pub fn download_filename(&self, filename: &str) -> String {
        format!("{}{}", self.download_prefix, filename)
    }
}

fn contains_mime(types: &[String], mime: &str) -> bool {
    let mime = mime.trim();
    types.iter().any(|t| t.eq_ignore_ascii_case(mime))
}
