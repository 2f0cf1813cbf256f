// Object storage for uploaded pictures

pub mod content_type;
pub mod s3_client;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use content_type::detect_content_type;
pub use s3_client::S3Client;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read upload content: file is empty")]
    EmptyContent,

    #[error("Upload error: {0}")]
    Write(String),
}

/// Remote blob store: writes `body` under `key` and returns its public URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

/// Result of a successful [`store_upload`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub content_type: &'static str,
}

/// Object key for an upload: `YYYYMMDDHHMMSS-<file name>`.
///
/// Two uploads of the same file name within one second share a key; the
/// later write replaces the earlier object.
pub fn object_key(now: DateTime<Utc>, file_name: &str) -> String {
    format!("{}-{}", now.format("%Y%m%d%H%M%S"), file_name)
}

/// Sniff, name and write an uploaded file.
///
/// The content type comes from the leading bytes only, but the whole
/// buffer is written.
pub async fn store_upload(
    store: &dyn ObjectStore,
    content: Bytes,
    file_name: &str,
) -> Result<StoredObject, StorageError> {
    if content.is_empty() {
        return Err(StorageError::EmptyContent);
    }

    let content_type = detect_content_type(&content);
    let key = object_key(Utc::now(), file_name);

    tracing::debug!(
        "Storing upload: key={}, size={} bytes, content_type={}",
        key,
        content.len(),
        content_type
    );

    let url = store.put_object(&key, content, content_type).await?;

    Ok(StoredObject {
        key,
        url,
        content_type,
    })
}
