//! Brand style analysis: derive a style guide from a brand's example posts.

use carousel_core::extraction::extract_json_object;
use carousel_core::tier::MODEL_TEXT;
use carousel_core::types::DbId;
use carousel_db::models::brand::{Brand, BrandExample};
use carousel_db::repositories::BrandRepo;
use carousel_gateway::AiGateway;
use sqlx::PgPool;

use crate::error::PipelineError;

/// Analyze a brand's examples and store the derived style guide, clearing
/// the staleness tracking fields.
///
/// The guide is only ever recomputed through this call — edits to the
/// examples merely mark it dirty.
pub async fn analyze_brand_style(
    pool: &PgPool,
    gateway: &dyn AiGateway,
    brand_id: DbId,
) -> Result<serde_json::Value, PipelineError> {
    let brand = BrandRepo::find_by_id(pool, brand_id)
        .await?
        .ok_or(PipelineError::NotFound {
            entity: "Brand",
            id: brand_id,
        })?;

    let examples = BrandRepo::list_examples(pool, brand_id).await?;
    if examples.is_empty() {
        return Err(PipelineError::Validation(
            "Brand has no example posts to analyze".into(),
        ));
    }

    let instruction = build_style_instruction(&brand, &examples);
    // Unlike the other single-shot stages, a rate limit here surfaces to
    // the caller as 429 rather than a generic upstream failure.
    let reply = gateway
        .generate_text(MODEL_TEXT, &instruction)
        .await
        .map_err(|err| {
            if err.is_rate_limited() {
                PipelineError::RateLimited(err.to_string())
            } else {
                PipelineError::Gateway(err)
            }
        })?;
    let style_guide = extract_json_object(&reply).ok_or(PipelineError::Extraction {
        stage: "style analysis",
    })?;

    BrandRepo::store_style_guide(pool, brand_id, &style_guide).await?;
    tracing::info!(brand_id, examples = examples.len(), "[style] Style guide derived");
    Ok(style_guide)
}

fn build_style_instruction(brand: &Brand, examples: &[BrandExample]) -> String {
    let mut out = format!(
        "Derive a visual style guide for the brand {} (palette {}) from its reference posts.\n",
        brand.name,
        brand.palette.0.join(", "),
    );
    out.push_str("Reference posts:\n");
    for example in examples {
        out.push_str(&format!(
            "- {} {}\n",
            example.image_url,
            example.notes.as_deref().unwrap_or("")
        ));
    }
    out.push_str(
        "\nAnswer with a single JSON object with the keys: preset_id, \
         recommended_templates (array), layout_rules (array), confirmed_palette (array).\n",
    );
    out
}
