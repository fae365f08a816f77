//! Handler for brand style analysis.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use carousel_core::types::DbId;
use carousel_pipeline::style;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::StyleAnalysisResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /brands/{id}/style-analysis
// ---------------------------------------------------------------------------

/// Derive a style guide from the brand's example posts and store it.
pub async fn analyze_style(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(brand_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let style_guide =
        style::analyze_brand_style(&state.pool, state.gateway.as_ref(), brand_id).await?;
    Ok(Json(StyleAnalysisResponse {
        success: true,
        style_guide,
    }))
}
