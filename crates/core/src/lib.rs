//! Pure domain logic for the carousel content studio.
//!
//! Everything in this crate is synchronous-computation or in-process state
//! (the draft cache): no database or network access. The pipeline and API
//! crates build on these primitives.

pub mod brand_tokens;
pub mod brief;
pub mod content_type;
pub mod draft;
pub mod error;
pub mod extraction;
pub mod ranking;
pub mod slide_image;
pub mod tier;
pub mod types;
