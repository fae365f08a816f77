//! Repository for the `visual_briefs` table.

use carousel_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::visual_brief::{UpsertVisualBrief, VisualBrief};

const COLUMNS: &str = "id, slide_id, theme, key_message, emotion, visual_metaphor, style, \
    palette, negative_elements, text_on_image, text_limit_words, composition_notes, \
    created_at, updated_at";

pub struct VisualBriefRepo;

impl VisualBriefRepo {
    /// Upsert a brief keyed by `slide_id`. Calling twice replaces the prior
    /// brief (overwrite semantics).
    pub async fn upsert(pool: &PgPool, input: &UpsertVisualBrief) -> Result<VisualBrief, sqlx::Error> {
        let query = format!(
            "INSERT INTO visual_briefs
                (slide_id, theme, key_message, emotion, visual_metaphor, style, palette,
                 negative_elements, text_on_image, text_limit_words, composition_notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (slide_id) DO UPDATE SET
                theme = EXCLUDED.theme,
                key_message = EXCLUDED.key_message,
                emotion = EXCLUDED.emotion,
                visual_metaphor = EXCLUDED.visual_metaphor,
                style = EXCLUDED.style,
                palette = EXCLUDED.palette,
                negative_elements = EXCLUDED.negative_elements,
                text_on_image = EXCLUDED.text_on_image,
                text_limit_words = EXCLUDED.text_limit_words,
                composition_notes = EXCLUDED.composition_notes,
                updated_at = now()
             RETURNING {COLUMNS}"
        );
        let f = &input.fields;
        sqlx::query_as::<_, VisualBrief>(&query)
            .bind(input.slide_id)
            .bind(&f.theme)
            .bind(&f.key_message)
            .bind(&f.emotion)
            .bind(&f.visual_metaphor)
            .bind(&f.style)
            .bind(Json(&f.palette))
            .bind(&f.negative_elements)
            .bind(f.text_on_image)
            .bind(f.text_limit_words)
            .bind(&f.composition_notes)
            .fetch_one(pool)
            .await
    }

    /// Find the brief for a slide, if one has been generated.
    pub async fn find_by_slide(
        pool: &PgPool,
        slide_id: DbId,
    ) -> Result<Option<VisualBrief>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visual_briefs WHERE slide_id = $1");
        sqlx::query_as::<_, VisualBrief>(&query)
            .bind(slide_id)
            .fetch_optional(pool)
            .await
    }
}
