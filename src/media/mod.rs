// src/media/mod.rs

//! Media hosting for recipe images
//!
//! A [`MediaHost`] takes image bytes and returns a public URL. Hosts are
//! built once at startup from [`MediaConfig`] and shared across requests.
//!
//! Backends:
//! - `cloudinary` - signed REST upload (reqwest)
//! - `s3` - any S3-compatible bucket (rust-s3, feature `s3`)

mod cloudinary;
#[cfg(feature = "s3")]
mod s3;

pub use cloudinary::CloudinaryHost;
#[cfg(feature = "s3")]
pub use s3::S3MediaHost;

use async_trait::async_trait;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors from a media host
#[derive(Error, Debug)]
pub enum MediaError {
    /// Transport-level failure talking to the host
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered but refused the upload
    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The host answered with something we could not interpret
    #[error("Invalid response from media host: {0}")]
    InvalidResponse(String),

    /// Object storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// An image was supplied but no host is configured
    #[error("Media host not configured")]
    NotConfigured,

    /// Host settings are incomplete or invalid
    #[error("Media configuration error: {0}")]
    Config(String),
}

/// An image received from a client, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True for MIME types under `image/`
    pub fn is_image(&self) -> bool {
        is_image_content_type(&self.content_type)
    }

    /// File extension matching the content type
    pub fn extension(&self) -> &'static str {
        let subtype = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match subtype.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/avif" => "avif",
            "image/svg+xml" => "svg",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            "image/heic" => "heic",
            _ => "bin",
        }
    }
}

/// True for MIME types under `image/`
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}

/// Something that can host an image and hand back its URL
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Upload the image, returning a publicly retrievable URL
    async fn upload(&self, image: &ImageUpload) -> Result<String, MediaError>;
}

/// Which media backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaProvider {
    /// No host; requests carrying an image fail
    #[default]
    None,
    Cloudinary,
    S3,
}

impl MediaProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaProvider::None => "none",
            MediaProvider::Cloudinary => "cloudinary",
            MediaProvider::S3 => "s3",
        }
    }
}

impl FromStr for MediaProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(MediaProvider::None),
            "cloudinary" => Ok(MediaProvider::Cloudinary),
            "s3" => Ok(MediaProvider::S3),
            other => Err(format!("Invalid media provider: {}", other)),
        }
    }
}

/// `[media]` configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub provider: MediaProvider,

    /// Cloudinary cloud name
    #[serde(default)]
    pub cloud_name: Option<String>,

    /// S3 bucket name
    #[serde(default)]
    pub bucket: Option<String>,

    /// API key (Cloudinary) or access key id (S3)
    #[serde(default)]
    pub api_key: Option<String>,

    /// API secret (Cloudinary) or secret access key (S3)
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Folder / key prefix for uploaded images
    #[serde(default = "default_folder")]
    pub folder: String,

    /// S3 region
    #[serde(default = "default_region")]
    pub region: String,

    /// S3 endpoint (R2, MinIO, ...); AWS when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Public base URL objects are served from (S3)
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Override for the Cloudinary API base (tests, proxies)
    #[serde(default)]
    pub api_base: Option<String>,

    /// Upload request timeout in seconds (Cloudinary)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            provider: MediaProvider::None,
            cloud_name: None,
            bucket: None,
            api_key: None,
            api_secret: None,
            folder: default_folder(),
            region: default_region(),
            endpoint: None,
            public_base_url: None,
            api_base: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_folder() -> String {
    "recipes".to_string()
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl MediaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn require<'a>(value: &'a Option<String>, what: &str) -> Result<&'a str, MediaError> {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| MediaError::Config(format!("media.{} is required", what)))
    }

    /// Check that the chosen provider has everything it needs
    pub fn validate(&self) -> Result<(), MediaError> {
        match self.provider {
            MediaProvider::None => Ok(()),
            MediaProvider::Cloudinary => {
                Self::require(&self.cloud_name, "cloud_name")?;
                Self::require(&self.api_key, "api_key")?;
                Self::require(&self.api_secret, "api_secret")?;
                Ok(())
            }
            MediaProvider::S3 => {
                Self::require(&self.bucket, "bucket")?;
                Self::require(&self.api_key, "api_key")?;
                Self::require(&self.api_secret, "api_secret")?;
                Self::require(&self.public_base_url, "public_base_url")?;
                if cfg!(feature = "s3") {
                    Ok(())
                } else {
                    Err(MediaError::Config(
                        "S3 media host requires the `s3` feature".to_string(),
                    ))
                }
            }
        }
    }

    /// Build the configured host, or `None` when no provider is set
    pub fn build(&self) -> Result<Option<Arc<dyn MediaHost>>, MediaError> {
        self.validate()?;

        match self.provider {
            MediaProvider::None => {
                info!("Media host: disabled");
                Ok(None)
            }
            MediaProvider::Cloudinary => {
                let mut host = CloudinaryHost::new(
                    Self::require(&self.cloud_name, "cloud_name")?,
                    Self::require(&self.api_key, "api_key")?,
                    Self::require(&self.api_secret, "api_secret")?,
                    self.timeout(),
                )?
                .with_folder(&self.folder);
                if let Some(base) = &self.api_base {
                    host = host.with_api_base(base);
                }
                info!("Media host: cloudinary ({})", host.cloud_name());
                Ok(Some(Arc::new(host)))
            }
            #[cfg(feature = "s3")]
            MediaProvider::S3 => {
                let host = S3MediaHost::new(
                    Self::require(&self.bucket, "bucket")?,
                    &self.region,
                    self.endpoint.as_deref(),
                    Self::require(&self.api_key, "api_key")?,
                    Self::require(&self.api_secret, "api_secret")?,
                    Self::require(&self.public_base_url, "public_base_url")?,
                    &self.folder,
                )?;
                info!("Media host: s3 ({})", host.bucket_name());
                Ok(Some(Arc::new(host)))
            }
            #[cfg(not(feature = "s3"))]
            MediaProvider::S3 => Err(MediaError::Config(
                "S3 media host requires the `s3` feature".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_content_type() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("IMAGE/JPEG"));
        assert!(!is_image_content_type("application/pdf"));
        assert!(!is_image_content_type("text/image/png"));
    }

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(ImageUpload::new(vec![], "image/jpeg").extension(), "jpg");
        assert_eq!(ImageUpload::new(vec![], "image/png; charset=binary").extension(), "png");
        assert_eq!(ImageUpload::new(vec![], "image/svg+xml").extension(), "svg");
        assert_eq!(ImageUpload::new(vec![], "image/x-unknown").extension(), "bin");
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("cloudinary".parse::<MediaProvider>().unwrap(), MediaProvider::Cloudinary);
        assert_eq!("S3".parse::<MediaProvider>().unwrap(), MediaProvider::S3);
        assert_eq!("".parse::<MediaProvider>().unwrap(), MediaProvider::None);
        assert!("imgur".parse::<MediaProvider>().is_err());
    }

    #[test]
    fn test_default_config_builds_nothing() {
        let config = MediaConfig::default();
        assert!(config.build().unwrap().is_none());
    }

    #[test]
    fn test_cloudinary_requires_credentials() {
        let config = MediaConfig {
            provider: MediaProvider::Cloudinary,
            cloud_name: Some("demo".to_string()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_cloudinary_builds() {
        let config = MediaConfig {
            provider: MediaProvider::Cloudinary,
            cloud_name: Some("demo".to_string()),
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            ..Default::default()
        };
        let host = config.build().unwrap().unwrap();
        assert_eq!(host.name(), "cloudinary");
    }

    #[test]
    fn test_s3_requires_public_url() {
        let config = MediaConfig {
            provider: MediaProvider::S3,
            bucket: Some("recipes".to_string()),
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
