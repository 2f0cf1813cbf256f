use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored form submission as returned by the list endpoint.
///
/// The collection has no schema, so every field is optional. Fields this
/// service did not write, or wrote with another type, are kept in `extra`
/// and rendered as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Public URL of the stored picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Record to insert after the picture has been stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewUploadRecord {
    pub name: String,
    pub email: String,
    pub picture: String,
    pub created_at: DateTime<Utc>,
}

impl NewUploadRecord {
    /// Record stamped with the current server time
    pub fn new(name: String, email: String, picture: String) -> Self {
        Self {
            name,
            email,
            picture,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
