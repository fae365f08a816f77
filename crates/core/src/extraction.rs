//! Best-effort extraction of a JSON object from free-form model output.
//!
//! Text models are asked to answer with a JSON object but routinely wrap it
//! in prose, markdown fences, or emit several `{...}`-looking fragments.
//! [`extract_json_object`] scans the text for candidate top-level objects by
//! brace matching (string- and escape-aware) and returns the first candidate
//! that actually parses.

/// Extract the first parseable top-level JSON object from `text`.
///
/// Returns `None` when no balanced `{...}` substring parses as JSON.
pub fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    let bytes = text.as_bytes();
    let mut start = 0;

    while let Some(offset) = text[start..].find('{') {
        let open = start + offset;
        if let Some(end) = find_balanced_end(bytes, open) {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text[open..=end]) {
                if value.is_object() {
                    return Some(value);
                }
            }
        }
        start = open + 1;
    }

    None
}

/// Find the index of the brace closing the object opened at `open`.
///
/// Tracks string literals and backslash escapes so braces inside strings do
/// not affect the depth count.
fn find_balanced_end(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}
