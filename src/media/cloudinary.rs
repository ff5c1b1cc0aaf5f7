// src/media/cloudinary.rs

//! Cloudinary image host
//!
//! Uploads go to `POST {api_base}/v1_1/{cloud}/image/upload` as a signed
//! multipart form. The signature is the SHA-256 of the sorted signed
//! parameters followed by the API secret.

use super::{ImageUpload, MediaError, MediaHost};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Fields of the upload response we care about
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Signed-upload client for one Cloudinary cloud
pub struct CloudinaryHost {
    client: Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: Option<String>,
}

impl CloudinaryHost {
    pub fn new(
        cloud_name: &str,
        api_key: &str,
        api_secret: &str,
        timeout: Duration,
    ) -> Result<Self, MediaError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("recipebox/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MediaError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            folder: None,
        })
    }

    /// Store uploads under this folder; empty means the account root
    pub fn with_folder(mut self, folder: &str) -> Self {
        let folder = folder.trim().trim_matches('/');
        self.folder = (!folder.is_empty()).then(|| folder.to_string());
        self
    }

    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/image/upload", self.api_base, self.cloud_name)
    }

    /// Signed parameters for an upload at `timestamp`
    fn signed_params(&self, timestamp: u64) -> Vec<(&'static str, String)> {
        let mut params = vec![("timestamp", timestamp.to_string())];
        if let Some(folder) = &self.folder {
            params.push(("folder", folder.clone()));
        }
        params
    }
}

/// `k1=v1&k2=v2` with keys sorted, the string Cloudinary signs
fn string_to_sign(params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex SHA-256 over the sorted parameters followed by the secret
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    fn name(&self) -> &str {
        "cloudinary"
    }

    async fn upload(&self, image: &ImageUpload) -> Result<String, MediaError> {
        let params = self.signed_params(unix_now());
        let signature = sign(&params, &self.api_secret);

        let file_name = image
            .file_name
            .clone()
            .unwrap_or_else(|| format!("upload.{}", image.extension()));
        let part = Part::bytes(image.bytes.clone())
            .file_name(file_name)
            .mime_str(&image.content_type)?;

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        debug!(
            "Uploading {} bytes ({}) to cloudinary cloud {}",
            image.len(),
            image.content_type,
            self.cloud_name
        );

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Cloudinary rejected upload: {} {}", status, message);
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        body.secure_url
            .or(body.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| MediaError::InvalidResponse("response carried no URL".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> CloudinaryHost {
        CloudinaryHost::new("demo", "key", "secret", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_string_to_sign_sorts_keys() {
        let params = vec![
            ("timestamp", "1315060510".to_string()),
            ("folder", "recipes".to_string()),
        ];
        assert_eq!(string_to_sign(&params), "folder=recipes&timestamp=1315060510");
    }

    #[test]
    fn test_sign_is_deterministic_hex() {
        let params = vec![("timestamp", "1315060510".to_string())];
        let a = sign(&params, "abcd");
        let b = sign(&params, "abcd");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, sign(&params, "other"));
    }

    #[test]
    fn test_sign_matches_manual_digest() {
        let params = vec![("timestamp", "1".to_string()), ("folder", "f".to_string())];
        let expected = hex::encode(Sha256::digest(b"folder=f&timestamp=1s3cret"));
        assert_eq!(sign(&params, "s3cret"), expected);
    }

    #[test]
    fn test_folder_is_normalized() {
        let h = host().with_folder("/recipes/");
        assert_eq!(h.folder.as_deref(), Some("recipes"));
        let h = host().with_folder("  ");
        assert!(h.folder.is_none());
        assert_eq!(h.signed_params(7).len(), 1);
    }

    #[test]
    fn test_upload_url() {
        let h = host().with_api_base("http://localhost:9000/");
        assert_eq!(h.upload_url(), "http://localhost:9000/v1_1/demo/image/upload");
    }
}
