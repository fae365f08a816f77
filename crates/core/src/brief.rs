//! Visual brief field extraction and defaulting.
//!
//! A brief is what the text model returns for one slide: theme, emotion,
//! style, palette, and text constraints. The model is free to omit fields;
//! [`BriefFields::from_model_json`] fills the documented defaults so the rest
//! of the system always sees a complete brief.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default word limit for text rendered on the image.
pub const DEFAULT_TEXT_LIMIT_WORDS: i32 = 10;

/// A complete set of visual brief fields, defaults applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BriefFields {
    pub theme: Option<String>,
    pub key_message: Option<String>,
    pub emotion: Option<String>,
    pub visual_metaphor: Option<String>,
    pub style: Option<String>,
    /// Falls back to the brand palette when the model omits it.
    pub palette: Vec<String>,
    pub negative_elements: Option<String>,
    /// Defaults to `true`.
    pub text_on_image: bool,
    /// Defaults to [`DEFAULT_TEXT_LIMIT_WORDS`].
    pub text_limit_words: i32,
    pub composition_notes: Option<String>,
}

impl BriefFields {
    /// Build brief fields from the JSON object extracted from the model
    /// reply, defaulting anything missing or malformed.
    pub fn from_model_json(value: &Value, brand_palette: &[String]) -> Self {
        let str_field = |key: &str| -> Option<String> {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let palette = value
            .get("palette")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|p: &Vec<String>| !p.is_empty())
            .unwrap_or_else(|| brand_palette.to_vec());

        Self {
            theme: str_field("theme"),
            key_message: str_field("key_message"),
            emotion: str_field("emotion"),
            visual_metaphor: str_field("visual_metaphor"),
            style: str_field("style"),
            palette,
            negative_elements: str_field("negative_elements"),
            text_on_image: value
                .get("text_on_image")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            text_limit_words: value
                .get("text_limit_words")
                .and_then(Value::as_i64)
                .map(|n| n as i32)
                .unwrap_or(DEFAULT_TEXT_LIMIT_WORDS),
            composition_notes: str_field("composition_notes"),
        }
    }
}
