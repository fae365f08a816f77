//! Client for the third-party AI gateway (text and image generation).
//!
//! The pipeline talks to the gateway through the [`AiGateway`] trait so
//! tests can substitute the [`fake::ScriptedGateway`] for the HTTP
//! implementation.

pub mod client;
pub mod fake;

pub use client::{AiGateway, GatewayConfig, GatewayError, GeneratedImage, HttpAiGateway};
