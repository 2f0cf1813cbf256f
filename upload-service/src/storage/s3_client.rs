//! S3 object storage client for uploaded pictures
//!
//! Objects are written with a public-read ACL and addressed by an
//! unsigned URL derived from the bucket name.

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    error::DisplayErrorContext,
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use bytes::Bytes;
use tracing::{error, info};

use super::{ObjectStore, StorageError};
use crate::config::StorageConfig;

/// S3 client for object storage operations
pub struct S3Client {
    client: Client,
    bucket: String,
    endpoint: Option<String>,
}

impl S3Client {
    /// Create a new S3 client from static credentials
    pub async fn new(config: &StorageConfig) -> Self {
        info!("Initializing S3 client for bucket: {}", config.bucket);

        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "upload-service-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    /// Public URL of `key`
    pub fn object_url(&self, key: &str) -> String {
        public_url(&self.bucket, self.endpoint.as_deref(), key)
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                error!("S3 upload failed for key {}: {}", key, detail);
                StorageError::Write(detail)
            })?;

        info!("File uploaded successfully: {} ({} bytes)", key, size);
        Ok(self.object_url(key))
    }
}

/// Virtual-hosted AWS URL, or path-style under a custom endpoint.
fn public_url(bucket: &str, endpoint: Option<&str>, key: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}/{}", endpoint, bucket, key),
        None => format!("https://{}.s3.amazonaws.com/{}", bucket, key),
    }
}
