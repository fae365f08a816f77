//! Quality tier constants and model selection.
//!
//! The tier is a coarse cost/quality knob: `cheap` routes image generation to
//! the default model, `high` to the premium one. Anything else falls back to
//! cheap rather than failing, matching the permissive request contract.

/// Default (cheap) image tier.
pub const TIER_CHEAP: &str = "cheap";
/// Premium image tier.
pub const TIER_HIGH: &str = "high";

/// Gateway model id for cheap image generation.
pub const MODEL_IMAGE_CHEAP: &str = "google/gemini-2.5-flash-image";
/// Gateway model id for high-quality image generation.
pub const MODEL_IMAGE_HIGH: &str = "google/gemini-2.5-pro-image";
/// Gateway model id for all text generation (briefs, prompts, ranking).
pub const MODEL_TEXT: &str = "google/gemini-2.5-flash";

/// Map a quality tier to the image model to call.
///
/// `high` selects the premium model; everything else (including absent or
/// unknown tiers) selects the cheap default.
pub fn image_model_for_tier(tier: Option<&str>) -> &'static str {
    match tier {
        Some(TIER_HIGH) => MODEL_IMAGE_HIGH,
        _ => MODEL_IMAGE_CHEAP,
    }
}
