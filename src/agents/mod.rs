// Model backends - the capability boundary to remote text models

pub mod classifier;
pub mod gemini;
pub mod invoker;
pub mod negotiator;

pub use gemini::GeminiClient;
pub use invoker::{GenerationInvoker, InvocationError};
pub use negotiator::{ModelNegotiator, NegotiatedModel, NegotiationError, ProbeFailure};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Closed set of provider failure kinds the pipeline reacts to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModelErrorKind {
    /// Quota exhausted or rate limited
    QuotaExceeded,
    /// Unknown model or model not serving this operation
    ModelUnavailable,
    Other,
}

/// Error reported by a model backend, already classified
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct ModelError {
    pub kind: ModelErrorKind,
    pub message: String,
}

impl ModelError {
    pub fn new(kind: ModelErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds an error whose kind is inferred from the message text
    pub fn classified(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: classifier::classify_message(&message),
            message,
        }
    }

    pub fn is_quota(&self) -> bool {
        self.kind == ModelErrorKind::QuotaExceeded
    }
}

/// Sampling parameters sent with a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
        }
    }
}

/// Remote text model capability.
///
/// Implementations map their transport failures onto [`ModelErrorKind`]
/// before returning; nothing downstream inspects message text.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    /// Issues a trivial request against `model_id` to check it answers
    async fn probe(&self, model_id: &str) -> Result<(), ModelError>;

    /// Sends `prompt` to `model_id` and returns the completion text
    async fn complete(
        &self,
        model_id: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ModelError>;
}

/// A negotiated model bound to the backend that serves it
#[derive(Clone)]
pub struct ModelHandle {
    pub model_id: String,
    backend: Arc<dyn ModelBackend>,
}

impl ModelHandle {
    pub fn new(model_id: impl Into<String>, backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            model_id: model_id.into(),
            backend,
        }
    }

    pub async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError> {
        self.backend.complete(&self.model_id, prompt, params).await
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model_id", &self.model_id)
            .field("backend", &self.backend.name())
            .finish()
    }
}
