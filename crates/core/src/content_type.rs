//! Well-known post content type constants.
//!
//! These must match the values stored in the `posts.content_type` column and
//! the options offered by the studio front end.

use crate::error::CoreError;

pub const CONTENT_NOTICIA: &str = "noticia";
pub const CONTENT_EDUCATIVO: &str = "educativo";
pub const CONTENT_FRASE: &str = "frase";
pub const CONTENT_CURIOSIDADE: &str = "curiosidade";
pub const CONTENT_TUTORIAL: &str = "tutorial";
pub const CONTENT_ANUNCIO: &str = "anuncio";

/// All valid content types.
pub const VALID_CONTENT_TYPES: &[&str] = &[
    CONTENT_NOTICIA,
    CONTENT_EDUCATIVO,
    CONTENT_FRASE,
    CONTENT_CURIOSIDADE,
    CONTENT_TUTORIAL,
    CONTENT_ANUNCIO,
];

/// Validate that a content type string is one of the known values.
pub fn validate_content_type(ct: &str) -> Result<(), CoreError> {
    if VALID_CONTENT_TYPES.contains(&ct) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown content type '{ct}'. Valid types: {}",
            VALID_CONTENT_TYPES.join(", ")
        )))
    }
}
