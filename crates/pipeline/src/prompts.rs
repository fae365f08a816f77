//! Image prompt builder: turns a slide's brief into prompt variants.

use carousel_core::extraction::extract_json_object;
use carousel_core::tier::{MODEL_TEXT, TIER_CHEAP};
use carousel_core::types::DbId;
use carousel_db::models::image_prompt::{CreateImagePrompt, ImagePrompt};
use carousel_db::models::visual_brief::VisualBrief;
use carousel_db::repositories::{ImagePromptRepo, SlideRepo, VisualBriefRepo};
use carousel_gateway::AiGateway;
use sqlx::PgPool;

use crate::error::PipelineError;

/// Default number of prompt variants per slide.
pub const DEFAULT_PROMPT_VARIANTS: u32 = 2;

/// Build prompt variants for a slide from its visual brief, replacing any
/// prior set.
///
/// The text model is asked for the variants; when its reply yields no
/// parseable JSON the stage degrades to a single deterministic prompt
/// assembled from the brief fields rather than failing.
pub async fn build_prompts(
    pool: &PgPool,
    gateway: &dyn AiGateway,
    slide_id: DbId,
    n_variants: Option<u32>,
) -> Result<Vec<ImagePrompt>, PipelineError> {
    let chain = SlideRepo::find_chain(pool, slide_id)
        .await?
        .ok_or(PipelineError::NotFound {
            entity: "Slide",
            id: slide_id,
        })?;

    let brief = VisualBriefRepo::find_by_slide(pool, slide_id)
        .await?
        .ok_or(PipelineError::NotFound {
            entity: "VisualBrief",
            id: slide_id,
        })?;

    let n = n_variants.unwrap_or(DEFAULT_PROMPT_VARIANTS).max(1);
    let instruction = build_prompt_instruction(&brief, &chain.brand.name, n);

    let reply = gateway.generate_text(MODEL_TEXT, &instruction).await?;
    let inputs = match extract_json_object(&reply).and_then(|v| parse_variants(&v)) {
        Some(variants) => variants,
        None => {
            tracing::warn!(
                slide_id,
                "[prompts] Unparseable variant reply, using deterministic fallback prompt",
            );
            vec![fallback_prompt(&brief)]
        }
    };

    let created = ImagePromptRepo::replace_for_slide(pool, slide_id, &inputs).await?;
    tracing::info!(slide_id, count = created.len(), "[prompts] Prompt variants replaced");
    Ok(created)
}

fn build_prompt_instruction(brief: &VisualBrief, brand_name: &str, n: u32) -> String {
    format!(
        "Write {n} image-generation prompt variants for a {brand_name} carousel slide.\n\
         Theme: {}\nEmotion: {}\nStyle: {}\nVisual metaphor: {}\nPalette: {}\nAvoid: {}\n\n\
         Answer with a single JSON object: {{\"variants\": [{{\"prompt\": string, \
         \"negative_prompt\": string}}]}}.",
        brief.theme.as_deref().unwrap_or("-"),
        brief.emotion.as_deref().unwrap_or("-"),
        brief.style.as_deref().unwrap_or("-"),
        brief.visual_metaphor.as_deref().unwrap_or("-"),
        brief.palette.0.join(", "),
        brief.negative_elements.as_deref().unwrap_or("-"),
    )
}

/// Pull `{"variants": [...]}` out of the extracted object.
fn parse_variants(value: &serde_json::Value) -> Option<Vec<CreateImagePrompt>> {
    let variants = value.get("variants")?.as_array()?;
    let inputs: Vec<CreateImagePrompt> = variants
        .iter()
        .filter_map(|v| {
            let prompt = v.get("prompt")?.as_str()?.to_string();
            Some(CreateImagePrompt {
                prompt,
                negative_prompt: v
                    .get("negative_prompt")
                    .and_then(|n| n.as_str())
                    .map(str::to_string),
                model_hint: TIER_CHEAP.to_string(),
                variant_index: 0,
            })
        })
        .enumerate()
        .map(|(i, mut input)| {
            input.variant_index = i as i32;
            input
        })
        .collect();
    if inputs.is_empty() {
        None
    } else {
        Some(inputs)
    }
}

/// Deterministic single-variant fallback assembled from the brief fields.
fn fallback_prompt(brief: &VisualBrief) -> CreateImagePrompt {
    let mut parts = Vec::new();
    for field in [&brief.theme, &brief.visual_metaphor, &brief.style] {
        if let Some(s) = field.as_deref().filter(|s| !s.is_empty()) {
            parts.push(s.to_string());
        }
    }
    if !brief.palette.0.is_empty() {
        parts.push(format!("color palette {}", brief.palette.0.join(" ")));
    }
    if parts.is_empty() {
        parts.push("clean minimal background for a social media slide".to_string());
    }
    CreateImagePrompt {
        prompt: parts.join(", "),
        negative_prompt: brief.negative_elements.clone(),
        model_hint: TIER_CHEAP.to_string(),
        variant_index: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use sqlx::types::Json;

    fn brief() -> VisualBrief {
        let now = Utc::now();
        VisualBrief {
            id: 1,
            slide_id: 1,
            theme: Some("dawn over a city".into()),
            key_message: None,
            emotion: Some("hope".into()),
            visual_metaphor: Some("sunrise".into()),
            style: Some("soft gradients".into()),
            palette: Json(vec!["#ff9900".into()]),
            negative_elements: Some("text, watermarks".into()),
            text_on_image: true,
            text_limit_words: 10,
            composition_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parses_variant_list_with_indexes() {
        let value = json!({"variants": [
            {"prompt": "a", "negative_prompt": "x"},
            {"prompt": "b"}
        ]});
        let inputs = parse_variants(&value).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].variant_index, 0);
        assert_eq!(inputs[1].variant_index, 1);
        assert_eq!(inputs[0].negative_prompt.as_deref(), Some("x"));
        assert!(inputs[1].negative_prompt.is_none());
    }

    #[test]
    fn empty_variant_list_is_rejected() {
        assert!(parse_variants(&json!({"variants": []})).is_none());
        assert!(parse_variants(&json!({"other": 1})).is_none());
    }

    #[test]
    fn fallback_prompt_uses_brief_fields() {
        let input = fallback_prompt(&brief());
        assert!(input.prompt.contains("dawn over a city"));
        assert!(input.prompt.contains("sunrise"));
        assert!(input.prompt.contains("#ff9900"));
        assert_eq!(input.negative_prompt.as_deref(), Some("text, watermarks"));
    }
}
