//! Download assembler: package a post's final images and caption as a ZIP.

use std::io::{Cursor, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use carousel_core::types::DbId;
use carousel_db::repositories::{ImageGenerationRepo, PostRepo, SlideRepo};
use carousel_gateway::AiGateway;
use sqlx::PgPool;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::PipelineError;

/// The assembled archive, base64-encoded for the JSON response.
#[derive(Debug)]
pub struct DownloadBundle {
    pub zip_base64: String,
    pub image_urls: Vec<String>,
    pub filename: String,
}

/// Assemble the download for a post.
///
/// Each slide contributes its selected generation's image (falling back to
/// the slide's own `image_url`); slides without an image, or whose fetch
/// fails, are skipped. A `caption.txt` with the caption and hashtags is
/// always included.
pub async fn assemble_download(
    pool: &PgPool,
    gateway: &dyn AiGateway,
    post_id: DbId,
) -> Result<DownloadBundle, PipelineError> {
    let post = PostRepo::find_by_id(pool, post_id)
        .await?
        .ok_or(PipelineError::NotFound {
            entity: "Content",
            id: post_id,
        })?;
    let slides = SlideRepo::list_by_post(pool, post_id).await?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let mut image_urls = Vec::new();

    for slide in &slides {
        let selected = ImageGenerationRepo::find_selected(pool, slide.id).await?;
        let url = selected
            .map(|g| g.image_url)
            .or_else(|| slide.image_url.clone());
        let Some(url) = url else {
            tracing::warn!(post_id, slide_id = slide.id, "[download] Slide has no image, skipping");
            continue;
        };

        let bytes = match gateway.fetch_image(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    post_id,
                    slide_id = slide.id,
                    error = %e,
                    "[download] Image fetch failed, skipping slide",
                );
                continue;
            }
        };

        let name = format!("slide_{:02}.png", slide.slide_index + 1);
        zip.start_file(name, options)
            .map_err(|e| PipelineError::Internal(format!("zip entry failed: {e}")))?;
        zip.write_all(&bytes)
            .map_err(|e| PipelineError::Internal(format!("zip write failed: {e}")))?;
        image_urls.push(url);
    }

    zip.start_file("caption.txt", options)
        .map_err(|e| PipelineError::Internal(format!("zip entry failed: {e}")))?;
    zip.write_all(caption_text(&post.caption, &post.hashtags.0).as_bytes())
        .map_err(|e| PipelineError::Internal(format!("zip write failed: {e}")))?;

    let cursor = zip
        .finish()
        .map_err(|e| PipelineError::Internal(format!("zip finish failed: {e}")))?;

    tracing::info!(post_id, images = image_urls.len(), "[download] Archive assembled");
    Ok(DownloadBundle {
        zip_base64: BASE64.encode(cursor.into_inner()),
        image_urls,
        filename: format!("post_{post_id}.zip"),
    })
}

fn caption_text(caption: &Option<String>, hashtags: &[String]) -> String {
    let mut out = caption.clone().unwrap_or_default();
    if !hashtags.is_empty() {
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(&hashtags.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_joins_hashtags_after_blank_line() {
        let text = caption_text(
            &Some("New drop".into()),
            &["#launch".into(), "#brand".into()],
        );
        assert_eq!(text, "New drop\n\n#launch #brand");
    }

    #[test]
    fn caption_handles_missing_parts() {
        assert_eq!(caption_text(&None, &[]), "");
        assert_eq!(caption_text(&None, &["#a".into()]), "#a");
        assert_eq!(caption_text(&Some("only".into()), &[]), "only");
    }
}
