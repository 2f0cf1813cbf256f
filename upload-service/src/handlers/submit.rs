use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::error::{AppError, AppResult};
use crate::models::{MessageResponse, NewUploadRecord};
use crate::storage;
use crate::AppState;

const PICTURE_FIELD: &str = "picture";

/// Parsed submit form
#[derive(Debug)]
struct SubmitForm {
    name: String,
    email: String,
    picture: Option<PicturePart>,
}

#[derive(Debug)]
struct PicturePart {
    file_name: String,
    content: Bytes,
}

/// Handle `POST /admin/post-submit`.
///
/// Stores the picture first, then the record. A failed insert leaves the
/// stored object in the bucket with no record pointing at it; nothing
/// cleans it up.
pub async fn post_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<MessageResponse>> {
    tracing::info!("Received form submission");

    let multipart = multipart.map_err(|e| AppError::InvalidUpload(e.body_text()))?;
    let form = read_form(multipart).await?;

    let picture = form
        .picture
        .ok_or_else(|| AppError::InvalidUpload("missing picture file".to_string()))?;

    let stored = storage::store_upload(state.objects.as_ref(), picture.content, &picture.file_name)
        .await?;

    let record = NewUploadRecord::new(form.name, form.email, stored.url.clone());

    if let Err(e) = state.records.insert(record).await {
        tracing::warn!(
            "Stored object has no record after insert failure: key={}, url={}",
            stored.key,
            stored.url
        );
        return Err(e.into());
    }

    tracing::info!(
        "Form submitted: picture={}, content_type={}",
        stored.url,
        stored.content_type
    );

    Ok(Json(MessageResponse {
        message: "Form submitted successfully".to_string(),
    }))
}

/// Read every part of the form before anything is stored.
async fn read_form(mut multipart: Multipart) -> AppResult<SubmitForm> {
    let mut form = SubmitForm {
        name: String::new(),
        email: String::new(),
        picture: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(format!("Invalid multipart: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        tracing::debug!("Processing field: {}", field_name);

        match field_name.as_str() {
            "name" => form.name = read_text(field).await?,
            "email" => form.email = read_text(field).await?,
            PICTURE_FIELD if form.picture.is_none() => {
                // a part without a file name is a plain value, not a file
                let Some(file_name) = field.file_name().map(base_name).filter(|n| !n.is_empty())
                else {
                    continue;
                };
                let file_name = file_name.to_string();

                let content = field.bytes().await.map_err(|e| {
                    AppError::InvalidUpload(format!("Failed to read file: {}", e))
                })?;

                tracing::info!(
                    "File received: filename={}, size={} bytes",
                    file_name,
                    content.len()
                );

                form.picture = Some(PicturePart { file_name, content });
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidUpload(format!("Invalid form field: {}", e)))
}

/// Last path segment of a client-supplied file name
fn base_name(file_name: &str) -> &str {
    file_name.rsplit(['/', '\\']).next().unwrap_or(file_name)
}
