//! Image variation generator.
//!
//! For each prompt, generates exactly N variations sequentially. Sequencing
//! plus the fixed inter-call delay is the upstream rate-limit throttle; a
//! 429 gets a single longer backoff and the variation is skipped, never
//! resubmitted. Individual failures reduce the result count but do not fail
//! the call.

use std::time::Duration;

use carousel_core::brand_tokens::BrandTokens;
use carousel_core::tier::image_model_for_tier;
use carousel_core::types::DbId;
use carousel_db::models::image_generation::{CreateImageGeneration, ImageGeneration};
use carousel_db::models::image_prompt::ImagePrompt;
use carousel_db::repositories::{ImageGenerationRepo, ImagePromptRepo, SlideRepo};
use carousel_gateway::AiGateway;
use carousel_storage::{generation_path, StorageProvider};
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::PipelineError;

/// Delay between consecutive image-model calls.
pub const VARIATION_DELAY: Duration = Duration::from_millis(500);

/// Backoff after an upstream 429 before moving to the next variation.
pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(2);

/// Default variations per prompt.
pub const DEFAULT_VARIATIONS: u32 = 2;

/// Request parameters for a variation batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariationParams {
    /// Restrict generation to one prompt instead of all of the slide's.
    pub prompt_id: Option<DbId>,
    /// `cheap` (default) or `high`.
    pub quality_tier: Option<String>,
    /// Variations per prompt, default [`DEFAULT_VARIATIONS`].
    pub n_variations: Option<u32>,
}

/// The rows created by one batch. `count` can be anything from zero to
/// prompts x variations; the caller must inspect it.
#[derive(Debug)]
pub struct VariationBatch {
    pub generations: Vec<ImageGeneration>,
    pub count: usize,
}

/// Generate candidate images for a slide's prompts.
pub async fn generate_variations(
    pool: &PgPool,
    gateway: &dyn AiGateway,
    storage: &dyn StorageProvider,
    slide_id: DbId,
    params: &VariationParams,
) -> Result<VariationBatch, PipelineError> {
    let chain = SlideRepo::find_chain(pool, slide_id)
        .await?
        .ok_or(PipelineError::NotFound {
            entity: "Slide",
            id: slide_id,
        })?;

    let prompts = load_prompts(pool, slide_id, params.prompt_id).await?;
    if prompts.is_empty() {
        return Err(PipelineError::Validation(
            "No image prompts for this slide. Run the brief and prompt builder first.".into(),
        ));
    }

    let tokens = BrandTokens {
        palette: chain.brand.palette.0.clone(),
        visual_tone: chain.brand.visual_tone.clone(),
        dont_rules: chain.brand.dont_rules.clone(),
    };
    let model = image_model_for_tier(params.quality_tier.as_deref());
    let n = params.n_variations.unwrap_or(DEFAULT_VARIATIONS).max(1);

    let mut generations = Vec::new();
    let mut first_call = true;

    for prompt in &prompts {
        for variation in 0..n {
            if !first_call {
                tokio::time::sleep(VARIATION_DELAY).await;
            }
            first_call = false;

            let composed = tokens.apply(&prompt.prompt);
            let image = match gateway
                .generate_image(model, &composed, prompt.negative_prompt.as_deref())
                .await
            {
                Ok(image) => image,
                Err(e) if e.is_rate_limited() => {
                    tracing::warn!(
                        slide_id,
                        prompt_id = prompt.id,
                        variation,
                        "[variations] Upstream rate limit, backing off and skipping variation",
                    );
                    tokio::time::sleep(RATE_LIMIT_BACKOFF).await;
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        slide_id,
                        prompt_id = prompt.id,
                        variation,
                        error = %e,
                        "[variations] Image generation failed, skipping variation",
                    );
                    continue;
                }
            };

            let path = generation_path(
                slide_id,
                prompt.id,
                variation,
                chrono::Utc::now().timestamp_millis(),
            );
            let url = match storage.put(&path, image.bytes, "image/png").await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(
                        slide_id,
                        prompt_id = prompt.id,
                        variation,
                        error = %e,
                        "[variations] Upload failed, skipping variation",
                    );
                    continue;
                }
            };

            let input = CreateImageGeneration {
                slide_id,
                prompt_id: Some(prompt.id),
                model_used: model.to_string(),
                image_url: url.clone(),
                thumb_url: Some(url),
                width: image.width,
                height: image.height,
                seed: image.seed,
            };
            match ImageGenerationRepo::create(pool, &input).await {
                Ok(row) => generations.push(row),
                Err(e) => {
                    tracing::warn!(
                        slide_id,
                        prompt_id = prompt.id,
                        variation,
                        error = %e,
                        "[variations] Failed to record generation, skipping variation",
                    );
                }
            }
        }
    }

    let count = generations.len();
    tracing::info!(slide_id, count, prompts = prompts.len(), "[variations] Batch complete");
    Ok(VariationBatch { generations, count })
}

/// Load the slide's prompts (ordered by variant index), or just the one
/// requested — which must belong to the slide.
async fn load_prompts(
    pool: &PgPool,
    slide_id: DbId,
    prompt_id: Option<DbId>,
) -> Result<Vec<ImagePrompt>, PipelineError> {
    match prompt_id {
        Some(id) => {
            let prompt = ImagePromptRepo::find_by_id(pool, id)
                .await?
                .filter(|p| p.slide_id == slide_id)
                .ok_or(PipelineError::NotFound {
                    entity: "ImagePrompt",
                    id,
                })?;
            Ok(vec![prompt])
        }
        None => Ok(ImagePromptRepo::list_by_slide(pool, slide_id).await?),
    }
}
