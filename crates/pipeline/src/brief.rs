//! Visual brief generator: one text-model call per slide.

use carousel_core::brief::BriefFields;
use carousel_core::extraction::extract_json_object;
use carousel_core::tier::MODEL_TEXT;
use carousel_core::types::DbId;
use carousel_db::models::slide::SlideChain;
use carousel_db::models::visual_brief::{UpsertVisualBrief, VisualBrief};
use carousel_db::repositories::{SlideRepo, VisualBriefRepo};
use carousel_gateway::AiGateway;
use sqlx::PgPool;

use crate::error::PipelineError;

/// Generate (or regenerate) the visual brief for a slide.
///
/// Resolves the slide -> post -> project -> brand chain, sends one request
/// to the text model, extracts the first JSON object from the free-form
/// reply (no retry on failure), and upserts `visual_briefs` by slide id.
pub async fn generate_brief(
    pool: &PgPool,
    gateway: &dyn AiGateway,
    slide_id: DbId,
) -> Result<VisualBrief, PipelineError> {
    let chain = SlideRepo::find_chain(pool, slide_id)
        .await?
        .ok_or(PipelineError::NotFound {
            entity: "Slide",
            id: slide_id,
        })?;

    let instruction = build_brief_instruction(&chain);
    let reply = gateway.generate_text(MODEL_TEXT, &instruction).await?;

    let value = extract_json_object(&reply).ok_or(PipelineError::Extraction { stage: "brief" })?;
    let fields = BriefFields::from_model_json(&value, &chain.brand.palette.0);

    let brief = VisualBriefRepo::upsert(
        pool,
        &UpsertVisualBrief { slide_id, fields },
    )
    .await?;

    tracing::info!(
        slide_id,
        brief_id = brief.id,
        theme = brief.theme.as_deref().unwrap_or("-"),
        "[brief] Visual brief upserted",
    );
    Ok(brief)
}

/// Build the natural-language instruction for one slide's brief.
///
/// Embeds the brand rules and the post context; slide index 0 is marked as
/// the cover and must be impactful.
fn build_brief_instruction(chain: &SlideChain) -> String {
    let brand = &chain.brand;
    let post = &chain.post;
    let slide = &chain.slide;

    let mut out = String::new();
    out.push_str("You are an art director creating a visual brief for one slide of an Instagram carousel.\n\n");

    out.push_str(&format!("Brand: {}\n", brand.name));
    if let Some(tone) = brand.visual_tone.as_deref() {
        out.push_str(&format!("Visual tone: {tone}\n"));
    }
    out.push_str(&format!("Palette: {}\n", brand.palette.0.join(", ")));
    if let Some(rules) = brand.do_rules.as_deref() {
        out.push_str(&format!("Always: {rules}\n"));
    }
    if let Some(rules) = brand.dont_rules.as_deref() {
        out.push_str(&format!("Never: {rules}\n"));
    }

    out.push_str(&format!(
        "\nPost ({}): {}\n",
        post.content_type, post.raw_post_text
    ));
    out.push_str(&format!(
        "Slide {}: {}\n",
        slide.slide_index + 1,
        slide.slide_text
    ));
    if slide.is_cover() {
        out.push_str("This is the COVER slide. It must be impactful and stop the scroll.\n");
    }

    out.push_str(
        "\nAnswer with a single JSON object with the keys: theme, key_message, emotion, \
         visual_metaphor, style, palette (array of hex colors), negative_elements, \
         text_on_image (boolean), text_limit_words (integer), composition_notes.\n",
    );
    out
}
