//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or a `PgExecutor` where a method participates in
//! a transaction) as the first argument.

pub mod brand_repo;
pub mod image_generation_repo;
pub mod image_prompt_repo;
pub mod post_repo;
pub mod project_repo;
pub mod quality_metrics_repo;
pub mod slide_repo;
pub mod visual_brief_repo;

pub use brand_repo::BrandRepo;
pub use image_generation_repo::ImageGenerationRepo;
pub use image_prompt_repo::ImagePromptRepo;
pub use post_repo::PostRepo;
pub use project_repo::ProjectRepo;
pub use quality_metrics_repo::QualityMetricsRepo;
pub use slide_repo::SlideRepo;
pub use visual_brief_repo::VisualBriefRepo;
