//! Shared response envelope types for API handlers.
//!
//! Success responses carry `"success": true` plus the payload. Typed
//! structs instead of ad-hoc `serde_json::json!` keep the shapes stable
//! across handlers.

use carousel_db::models::image_generation::ImageGeneration;
use carousel_db::models::image_prompt::ImagePrompt;
use carousel_db::models::quality_metrics::QualityMetrics;
use carousel_db::models::visual_brief::VisualBrief;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BriefResponse {
    pub success: bool,
    pub brief: VisualBrief,
}

#[derive(Debug, Serialize)]
pub struct PromptsResponse {
    pub success: bool,
    pub prompts: Vec<ImagePrompt>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct VariationsResponse {
    pub success: bool,
    pub generations: Vec<ImageGeneration>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub success: bool,
    pub best: ImageGeneration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rankings: Option<Vec<ImageGeneration>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QualityMetrics>,
    pub fallback: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub success: bool,
    pub zip_base64: String,
    pub image_urls: Vec<String>,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct StyleAnalysisResponse {
    pub success: bool,
    #[serde(rename = "styleGuide")]
    pub style_guide: serde_json::Value,
}
