//! Slide image field normalization.
//!
//! The canonical slide image field is `image_url`. Older clients and drafts
//! still carry the aliases `previewImage`, `imageUrl`, and `image`; on read
//! they all resolve to the same value, and partial updates must never blank
//! a non-empty `image_url`.

use serde_json::Value;

/// Alias fields checked (in priority order, after `image_url` itself) when
/// resolving a slide's image.
const IMAGE_ALIASES: &[&str] = &["image_url", "previewImage", "imageUrl", "image"];

/// Resolve a slide's image URL, checking the canonical field first and the
/// legacy aliases after it. Empty strings count as absent.
pub fn get_slide_image_url(slide: &Value) -> Option<String> {
    for field in IMAGE_ALIASES {
        if let Some(url) = slide.get(*field).and_then(Value::as_str) {
            if !url.is_empty() {
                return Some(url.to_string());
            }
        }
    }
    None
}

/// Normalize a slide object to carry its image only under `image_url`.
///
/// The resolved URL (if any) is written to `image_url` and all alias fields
/// are removed. Idempotent: normalizing twice equals normalizing once.
pub fn normalize_slide_image(mut slide: Value) -> Value {
    let resolved = get_slide_image_url(&slide);
    if let Some(map) = slide.as_object_mut() {
        for field in IMAGE_ALIASES {
            map.remove(*field);
        }
        if let Some(url) = resolved {
            map.insert("image_url".to_string(), Value::String(url));
        }
    }
    slide
}

/// Merge a partial update into an existing slide.
///
/// Both sides are normalized before the field-wise merge, so an image the
/// update carries under a legacy alias lands on `image_url` and wins over
/// the existing value. Fields present in `update` win; an update with no
/// non-empty image (canonical or alias) inherits the existing slide's
/// `image_url`, so a partial update can never blank it.
pub fn merge_slide_update(existing: &Value, update: &Value) -> Value {
    let mut merged = normalize_slide_image(existing.clone());
    let patch = normalize_slide_image(update.clone());
    if let (Some(target), Some(patch)) = (merged.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_legacy_alias_to_canonical_field() {
        let slide = json!({"headline": "h", "previewImage": "https://cdn/img.png"});
        let normalized = normalize_slide_image(slide);
        assert_eq!(normalized["image_url"], "https://cdn/img.png");
        assert!(normalized.get("previewImage").is_none());
    }

    #[test]
    fn canonical_field_wins_over_aliases() {
        let slide = json!({"image_url": "https://cdn/a.png", "imageUrl": "https://cdn/b.png"});
        assert_eq!(
            get_slide_image_url(&slide).as_deref(),
            Some("https://cdn/a.png")
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let cases = [
            json!({"image": "https://cdn/x.png", "slide_text": "t"}),
            json!({"image_url": ""}),
            json!({"slide_text": "no image"}),
            json!({"image_url": "https://cdn/a.png", "previewImage": "https://cdn/b.png"}),
        ];
        for slide in cases {
            let once = normalize_slide_image(slide.clone());
            let twice = normalize_slide_image(once.clone());
            assert_eq!(once, twice, "not idempotent for {slide}");
        }
    }

    #[test]
    fn empty_string_counts_as_absent() {
        let slide = json!({"image_url": "", "image": "https://cdn/fallback.png"});
        assert_eq!(
            get_slide_image_url(&slide).as_deref(),
            Some("https://cdn/fallback.png")
        );
    }

    #[test]
    fn merge_preserves_existing_image() {
        let existing = json!({"headline": "old", "image_url": "https://cdn/keep.png"});
        let merged = merge_slide_update(&existing, &json!({"headline": "x"}));
        assert_eq!(merged["headline"], "x");
        assert_eq!(merged["image_url"], "https://cdn/keep.png");
    }

    #[test]
    fn merge_with_empty_image_does_not_blank_it() {
        let existing = json!({"image_url": "https://cdn/keep.png"});
        let merged = merge_slide_update(&existing, &json!({"image_url": ""}));
        assert_eq!(merged["image_url"], "https://cdn/keep.png");
    }

    #[test]
    fn alias_image_in_update_replaces_existing_canonical() {
        let existing = json!({"headline": "old", "image_url": "https://cdn/old.png"});
        let update = json!({"headline": "new", "imageUrl": "https://cdn/new.png"});
        let merged = merge_slide_update(&existing, &update);
        assert_eq!(merged["headline"], "new");
        assert_eq!(merged["image_url"], "https://cdn/new.png");
        assert!(merged.get("imageUrl").is_none());
    }

    #[test]
    fn merge_takes_new_image_when_provided() {
        let existing = json!({"image_url": "https://cdn/old.png"});
        let merged = merge_slide_update(&existing, &json!({"previewImage": "https://cdn/new.png"}));
        assert_eq!(merged["image_url"], "https://cdn/new.png");
        assert!(merged.get("previewImage").is_none());
    }
}
