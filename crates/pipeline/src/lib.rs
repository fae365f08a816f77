//! The multi-stage content-generation pipeline.
//!
//! Stages run in order: visual brief -> image prompts -> image variations ->
//! ranking & selection; download assembly and brand style analysis sit
//! alongside. Every stage is a free async function over the pool, the AI
//! gateway trait, and (where artwork is produced) the storage provider, so
//! tests drive the whole pipeline with scripted fakes.
//!
//! All upstream calls are sequential by design: the explicit inter-call
//! delays in the variation stage are the system's rate-limit throttle.

pub mod brief;
pub mod download;
pub mod error;
pub mod prompts;
pub mod ranking;
pub mod style;
pub mod variations;

pub use error::PipelineError;
