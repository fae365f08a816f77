//! Handler for the ZIP download assembler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use carousel_core::types::DbId;
use carousel_pipeline::download;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DownloadResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDownloadRequest {
    pub content_id: DbId,
}

// ---------------------------------------------------------------------------
// POST /downloads
// ---------------------------------------------------------------------------

/// Assemble a post's final images and caption into a base64-encoded ZIP.
pub async fn create_download(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDownloadRequest>,
) -> AppResult<impl IntoResponse> {
    tracing::info!(user_id = user.user_id, content_id = input.content_id, "[download] Requested");
    let bundle =
        download::assemble_download(&state.pool, state.gateway.as_ref(), input.content_id).await?;
    Ok(Json(DownloadResponse {
        success: true,
        zip_base64: bundle.zip_base64,
        image_urls: bundle.image_urls,
        filename: bundle.filename,
    }))
}
