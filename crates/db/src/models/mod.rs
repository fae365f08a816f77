//! Row types and DTOs, one module per table group.

pub mod brand;
pub mod image_generation;
pub mod image_prompt;
pub mod post;
pub mod project;
pub mod quality_metrics;
pub mod slide;
pub mod visual_brief;
