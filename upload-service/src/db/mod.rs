// Document store for submission records

pub mod repository;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewUploadRecord, UploadRecord};

pub use repository::MongoRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Insert error: {0}")]
    Insert(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist one record as written, no schema checks
    async fn insert(&self, record: NewUploadRecord) -> Result<(), RepositoryError>;

    /// Every record in the collection, in the store's natural order
    async fn find_all(&self) -> Result<Vec<UploadRecord>, RepositoryError>;
}
