pub mod brands;
pub mod downloads;
pub mod slides;
