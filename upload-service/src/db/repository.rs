use async_trait::async_trait;
use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{error::ErrorKind, Client, Collection};
use serde::Serialize;

use super::{RecordStore, RepositoryError};
use crate::config::DatabaseConfig;
use crate::models::{NewUploadRecord, UploadRecord};

/// Document layout written by this service
#[derive(Debug, Clone, Serialize)]
struct RecordDocument {
    name: String,
    email: String,
    picture: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    created_at: DateTime<Utc>,
}

impl From<NewUploadRecord> for RecordDocument {
    fn from(record: NewUploadRecord) -> Self {
        Self {
            name: record.name,
            email: record.email,
            picture: record.picture,
            created_at: record.created_at,
        }
    }
}

/// Map a stored document without assuming it was written by this service.
fn record_from_document(doc: Document) -> UploadRecord {
    let mut record = UploadRecord::default();

    for (key, value) in doc {
        match (key.as_str(), value) {
            ("_id", Bson::ObjectId(id)) => record.id = Some(id.to_hex()),
            ("name", Bson::String(name)) => record.name = Some(name),
            ("email", Bson::String(email)) => record.email = Some(email),
            ("picture", Bson::String(picture)) => record.picture = Some(picture),
            ("created_at", Bson::DateTime(at)) => record.created_at = Some(at.to_chrono()),
            (field, value) => {
                record.extra.insert(field.to_string(), value.into_relaxed_extjson());
            }
        }
    }

    record
}

/// MongoDB-backed record store.
///
/// Holds one driver client for the whole process; the driver pools
/// connections internally and dials lazily, so an unreachable server shows
/// up on the first insert or find rather than here.
pub struct MongoRepository {
    collection: Collection<RecordDocument>,
    documents: Collection<Document>,
}

impl MongoRepository {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(&config.uri).await?;
        let collection = client
            .database(&config.name)
            .collection::<RecordDocument>(&config.collection);

        tracing::info!(
            "MongoDB collection handle ready: {}.{}",
            config.name,
            config.collection
        );

        Ok(Self {
            documents: collection.clone_with_type(),
            collection,
        })
    }
}

#[async_trait]
impl RecordStore for MongoRepository {
    async fn insert(&self, record: NewUploadRecord) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .insert_one(RecordDocument::from(record), None)
            .await
            .map_err(|e| RepositoryError::Insert(e.to_string()))?;

        tracing::info!("Created upload record: id={}", result.inserted_id);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<UploadRecord>, RepositoryError> {
        let cursor = self
            .documents
            .find(None, None)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let documents: Vec<Document> = cursor.try_collect().await.map_err(cursor_error)?;

        tracing::debug!("Fetched {} upload records", documents.len());
        Ok(documents.into_iter().map(record_from_document).collect())
    }
}

fn cursor_error(err: mongodb::error::Error) -> RepositoryError {
    match err.kind.as_ref() {
        ErrorKind::BsonDeserialization(_) => RepositoryError::Decode(err.to_string()),
        _ => RepositoryError::Query(err.to_string()),
    }
}
