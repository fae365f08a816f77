//! Handlers for the per-slide pipeline stages: brief, prompts, variations,
//! and ranking.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use carousel_core::types::DbId;
use carousel_pipeline::variations::VariationParams;
use carousel_pipeline::{brief, prompts, ranking, variations};

use crate::error::AppResult;
use crate::response::{BriefResponse, PromptsResponse, RankResponse, VariationsResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /slides/{id}/brief
// ---------------------------------------------------------------------------

/// Generate (or regenerate) the visual brief for a slide.
pub async fn generate_brief(
    State(state): State<AppState>,
    Path(slide_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let brief = brief::generate_brief(&state.pool, state.gateway.as_ref(), slide_id).await?;
    Ok(Json(BriefResponse {
        success: true,
        brief,
    }))
}

// ---------------------------------------------------------------------------
// POST /slides/{id}/prompts
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct BuildPromptsRequest {
    pub n_variants: Option<u32>,
}

/// Build image prompt variants from the slide's brief, replacing any prior
/// set. The body is optional.
pub async fn build_prompts(
    State(state): State<AppState>,
    Path(slide_id): Path<DbId>,
    body: Option<Json<BuildPromptsRequest>>,
) -> AppResult<impl IntoResponse> {
    let params = body.map(|Json(b)| b).unwrap_or_default();
    let prompts =
        prompts::build_prompts(&state.pool, state.gateway.as_ref(), slide_id, params.n_variants)
            .await?;
    let count = prompts.len();
    Ok(Json(PromptsResponse {
        success: true,
        prompts,
        count,
    }))
}

// ---------------------------------------------------------------------------
// POST /slides/{id}/variations
// ---------------------------------------------------------------------------

/// Generate candidate images for the slide's prompts. The body is optional;
/// defaults are one batch over all prompts at the cheap tier.
pub async fn generate_variations(
    State(state): State<AppState>,
    Path(slide_id): Path<DbId>,
    body: Option<Json<VariationParams>>,
) -> AppResult<impl IntoResponse> {
    let params = body.map(|Json(b)| b).unwrap_or_default();
    let batch = variations::generate_variations(
        &state.pool,
        state.gateway.as_ref(),
        state.storage.as_ref(),
        slide_id,
        &params,
    )
    .await?;
    Ok(Json(VariationsResponse {
        success: true,
        generations: batch.generations,
        count: batch.count,
    }))
}

// ---------------------------------------------------------------------------
// POST /slides/{id}/rank
// ---------------------------------------------------------------------------

/// Rank the slide's recent generations and select exactly one.
pub async fn rank_slide(
    State(state): State<AppState>,
    Path(slide_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let result = ranking::rank_and_select(&state.pool, state.gateway.as_ref(), slide_id).await?;
    Ok(Json(RankResponse {
        success: true,
        best: result.best,
        rankings: result.rankings,
        metrics: result.metrics,
        fallback: result.fallback,
    }))
}
