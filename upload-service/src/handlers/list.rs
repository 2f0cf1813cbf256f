use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::UploadRecord;
use crate::AppState;

/// Handle `GET /admin/posts`: every stored record, unfiltered and unpaged.
pub async fn fetch_posts(State(state): State<AppState>) -> AppResult<Json<Vec<UploadRecord>>> {
    let records = state.records.find_all().await?;

    tracing::info!("Returning {} records", records.len());
    Ok(Json(records))
}
