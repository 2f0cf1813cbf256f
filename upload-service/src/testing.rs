//! In-memory collaborators and request builders for handler tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
    Router,
};
use bytes::Bytes;

use crate::db::{RecordStore, RepositoryError};
use crate::models::{NewUploadRecord, UploadRecord};
use crate::routes;
use crate::storage::{ObjectStore, StorageError};
use crate::AppState;

pub const FRONTEND_ORIGIN: &str = "http://localhost:3000";
const BOUNDARY: &str = "X-UPLOAD-SERVICE-BOUNDARY";

/// Router wired to the given collaborators
pub fn app(objects: Arc<dyn ObjectStore>, records: Arc<dyn RecordStore>) -> Router {
    app_with_limit(objects, records, 32 * 1024 * 1024)
}

/// Same as [`app`] with a custom request-body ceiling
pub fn app_with_limit(
    objects: Arc<dyn ObjectStore>,
    records: Arc<dyn RecordStore>,
    max_upload_bytes: usize,
) -> Router {
    let cors = routes::cors_layer(FRONTEND_ORIGIN).unwrap();
    routes::router(AppState { objects, records }, cors, max_upload_bytes)
}

/// A JPEG header padded out to `len` bytes
pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    data.resize(len.max(data.len()), 0x5A);
    data
}

pub enum Part {
    Text {
        name: &'static str,
        value: &'static str,
    },
    File {
        name: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        content: Vec<u8>,
    },
}

impl Part {
    pub fn text(name: &'static str, value: &'static str) -> Self {
        Part::Text { name, value }
    }

    pub fn file(
        name: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        content: Vec<u8>,
    ) -> Self {
        Part::File {
            name,
            file_name,
            content_type,
            content,
        }
    }
}

pub fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                content,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&content);
            }
        }
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn submit_request(parts: Vec<Part>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/admin/post-submit")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn list_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/admin/posts")
        .body(Body::empty())
        .unwrap()
}

pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[derive(Debug, Clone)]
pub struct PutCall {
    pub key: String,
    pub size: usize,
    pub content_type: String,
}

/// Bucket kept in memory; URLs follow the AWS virtual-hosted form.
pub struct MemoryObjectStore {
    bucket: String,
    objects: Mutex<HashMap<String, Bytes>>,
    puts: Mutex<Vec<PutCall>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(HashMap::new()),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn puts(&self) -> Vec<PutCall> {
        self.puts.lock().unwrap().clone()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("https://{}.s3.amazonaws.com/{}", self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.puts.lock().unwrap().push(PutCall {
            key: key.to_string(),
            size: body.len(),
            content_type: content_type.to_string(),
        });
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(self.url_for(key))
    }
}

#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<NewUploadRecord>>,
}

impl MemoryRecordStore {
    pub fn records(&self) -> Vec<NewUploadRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: NewUploadRecord) -> Result<(), RepositoryError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<UploadRecord>, RepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .enumerate()
            .map(|(i, r)| UploadRecord {
                id: Some(format!("{:024x}", i)),
                name: Some(r.name.clone()),
                email: Some(r.email.clone()),
                picture: Some(r.picture.clone()),
                created_at: Some(r.created_at),
                ..Default::default()
            })
            .collect())
    }
}
