// src/media/s3.rs

//! S3-compatible image host (AWS, R2, MinIO)
//!
//! Objects land at `{prefix}/{uuid}.{ext}` and are served from
//! `public_base_url`, which must point at a publicly readable view of the
//! bucket.

use super::{ImageUpload, MediaError, MediaHost};
use async_trait::async_trait;
use ::s3::bucket::Bucket;
use ::s3::region::Region;
use ::s3::creds::Credentials;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct S3MediaHost {
    bucket: Box<Bucket>,
    bucket_name: String,
    public_base_url: String,
    prefix: String,
}

impl S3MediaHost {
    pub fn new(
        bucket_name: &str,
        region: &str,
        endpoint: Option<&str>,
        access_key: &str,
        secret_key: &str,
        public_base_url: &str,
        prefix: &str,
    ) -> Result<Self, MediaError> {
        let region = match endpoint {
            Some(endpoint) => Region::Custom {
                region: region.to_string(),
                endpoint: endpoint.to_string(),
            },
            None => region
                .parse::<Region>()
                .map_err(|e| MediaError::Config(format!("Invalid S3 region '{}': {}", region, e)))?,
        };

        let credentials = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| MediaError::Config(format!("Invalid S3 credentials: {}", e)))?;

        let mut bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| MediaError::Config(format!("Failed to open bucket: {}", e)))?;
        if endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            bucket_name: bucket_name.to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            prefix: prefix.trim().trim_matches('/').to_string(),
        })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    fn object_key(&self, image: &ImageUpload) -> String {
        let name = format!("{}.{}", Uuid::new_v4(), image.extension());
        if self.prefix.is_empty() {
            name
        } else {
            format!("{}/{}", self.prefix, name)
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[async_trait]
impl MediaHost for S3MediaHost {
    fn name(&self) -> &str {
        "s3"
    }

    async fn upload(&self, image: &ImageUpload) -> Result<String, MediaError> {
        let key = self.object_key(image);
        debug!("Uploading {} bytes to s3://{}/{}", image.len(), self.bucket_name, key);

        let response = self
            .bucket
            .put_object_with_content_type(&key, &image.bytes, &image.content_type)
            .await
            .map_err(|e| MediaError::Storage(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            let message = String::from_utf8_lossy(response.as_slice()).into_owned();
            warn!("S3 rejected upload of {}: {}", key, status);
            return Err(MediaError::Rejected { status, message });
        }

        Ok(self.public_url(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(prefix: &str) -> S3MediaHost {
        S3MediaHost::new(
            "recipes",
            "auto",
            Some("http://localhost:9000"),
            "access",
            "secret",
            "https://cdn.example.com/",
            prefix,
        )
        .unwrap()
    }

    #[test]
    fn test_object_key_layout() {
        let h = host("/images/");
        let key = h.object_key(&ImageUpload::new(vec![1], "image/png"));
        assert!(key.starts_with("images/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_object_key_without_prefix() {
        let h = host("");
        let key = h.object_key(&ImageUpload::new(vec![1], "image/jpeg"));
        assert!(!key.contains('/'));
        assert!(key.ends_with(".jpg"));
    }

    #[test]
    fn test_public_url() {
        let h = host("images");
        assert_eq!(
            h.public_url("images/a.png"),
            "https://cdn.example.com/images/a.png"
        );
    }
}
