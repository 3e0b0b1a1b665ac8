//! S3-backed image storage for catalog uploads
//!
//! Uploads delegate to external object storage; the API only hands back the
//! public URL of the stored object.

use anyhow::Result;
use aws_sdk_s3::{Client, primitives::ByteStream};
use tracing::info;
use uuid::Uuid;

/// Formats accepted for catalog images
const ALLOWED_FORMATS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket receiving uploaded images
    pub bucket: String,
    /// Public base URL for stored objects
    pub public_url: String,
    /// Key prefix (folder) for uploads
    pub key_prefix: String,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `UPLOAD_BUCKET_NAME`: Target bucket (default: "storefront-uploads")
    /// - `UPLOAD_PUBLIC_URL`: Public base URL (default: the bucket's S3 URL)
    /// - `UPLOAD_KEY_PREFIX`: Key prefix (default: "products")
    pub fn from_env() -> Self {
        let bucket =
            std::env::var("UPLOAD_BUCKET_NAME").unwrap_or_else(|_| "storefront-uploads".to_string());
        let public_url = std::env::var("UPLOAD_PUBLIC_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.amazonaws.com", bucket));
        let key_prefix = std::env::var("UPLOAD_KEY_PREFIX").unwrap_or_else(|_| "products".to_string());

        StorageConfig {
            bucket,
            public_url,
            key_prefix,
        }
    }
}

/// Image store backed by S3
#[derive(Clone)]
pub struct ImageStore {
    s3_client: Client,
    config: StorageConfig,
}

impl ImageStore {
    pub fn new(s3_client: Client, config: StorageConfig) -> Self {
        Self { s3_client, config }
    }

    /// Upload an image and return its public URL
    pub async fn upload_image(
        &self,
        extension: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String> {
        let key = format!("{}/{}.{}", self.config.key_prefix, Uuid::new_v4(), extension);

        info!("Uploading image to S3: {}", key);

        self.s3_client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await?;

        Ok(format!("{}/{}", self.config.public_url, key))
    }
}

/// Extract and validate the image extension from an uploaded file name.
/// Returns `None` for formats outside the allowed set.
pub fn image_extension(file_name: &str) -> Option<String> {
    let extension = file_name.rsplit('.').next()?.to_ascii_lowercase();
    if file_name.contains('.') && ALLOWED_FORMATS.contains(&extension.as_str()) {
        Some(extension)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_accepts_allowed_formats() {
        assert_eq!(image_extension("chilli.jpg").as_deref(), Some("jpg"));
        assert_eq!(image_extension("pack.PNG").as_deref(), Some("png"));
        assert_eq!(image_extension("photo.final.webp").as_deref(), Some("webp"));
    }

    #[test]
    fn test_image_extension_rejects_other_formats() {
        assert!(image_extension("report.pdf").is_none());
        assert!(image_extension("archive.tar.gz").is_none());
        assert!(image_extension("noextension").is_none());
    }
}
