//! Scripted in-process gateway for tests.
//!
//! Text replies must be scripted explicitly (an unscripted text call fails
//! with a 500-shaped error). Image replies default to a stub success when
//! the queue is empty, so an N-variation loop does not need N pushes.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{AiGateway, GatewayError, GeneratedImage};

enum Reply<T> {
    Value(T),
    Status(u16),
}

impl GeneratedImage {
    /// A minimal stand-in image payload.
    pub fn stub() -> Self {
        Self {
            bytes: vec![0x89, b'P', b'N', b'G'],
            width: Some(1080),
            height: Some(1350),
            seed: Some(7),
        }
    }
}

/// [`AiGateway`] implementation driven by pre-scripted replies.
#[derive(Default)]
pub struct ScriptedGateway {
    texts: Mutex<VecDeque<Reply<String>>>,
    images: Mutex<VecDeque<Reply<GeneratedImage>>>,
    /// Every prompt sent to the text model, in call order.
    pub text_prompts: Mutex<Vec<String>>,
    /// Every `(model, prompt)` sent to the image model, in call order.
    pub image_prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful text reply.
    pub fn push_text(&self, reply: impl Into<String>) {
        self.texts.lock().unwrap().push_back(Reply::Value(reply.into()));
    }

    /// Queue a failed text call with the given upstream status.
    pub fn push_text_failure(&self, status: u16) {
        self.texts.lock().unwrap().push_back(Reply::Status(status));
    }

    /// Queue a successful image reply.
    pub fn push_image(&self, image: GeneratedImage) {
        self.images.lock().unwrap().push_back(Reply::Value(image));
    }

    /// Queue a failed image call with the given upstream status.
    pub fn push_image_failure(&self, status: u16) {
        self.images.lock().unwrap().push_back(Reply::Status(status));
    }

    fn api_error(status: u16) -> GatewayError {
        GatewayError::Api {
            status,
            body: "scripted failure".into(),
        }
    }
}

#[async_trait]
impl AiGateway for ScriptedGateway {
    async fn generate_text(&self, _model: &str, prompt: &str) -> Result<String, GatewayError> {
        self.text_prompts.lock().unwrap().push(prompt.to_string());
        match self.texts.lock().unwrap().pop_front() {
            Some(Reply::Value(reply)) => Ok(reply),
            Some(Reply::Status(status)) => Err(Self::api_error(status)),
            None => Err(Self::api_error(500)),
        }
    }

    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
        _negative_prompt: Option<&str>,
    ) -> Result<GeneratedImage, GatewayError> {
        self.image_prompts
            .lock()
            .unwrap()
            .push((model.to_string(), prompt.to_string()));
        match self.images.lock().unwrap().pop_front() {
            Some(Reply::Value(image)) => Ok(image),
            Some(Reply::Status(status)) => Err(Self::api_error(status)),
            None => Ok(GeneratedImage::stub()),
        }
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, GatewayError> {
        // Deterministic bytes derived from the URL.
        Ok(url.as_bytes().to_vec())
    }
}
