// Generation invocation raced against a deadline

use super::{GenerationParams, ModelErrorKind, ModelHandle};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("Model {model_id} quota exceeded: {message}")]
    QuotaExceeded { model_id: String, message: String },

    #[error("Model {model_id} did not answer within {timeout:?}")]
    Timeout { model_id: String, timeout: Duration },

    #[error("Model {model_id} request failed: {message}")]
    Failed { model_id: String, message: String },
}

impl InvocationError {
    pub fn is_quota(&self) -> bool {
        matches!(self, InvocationError::QuotaExceeded { .. })
    }
}

/// Sends one generation request and gives up after a fixed timeout
#[derive(Debug, Clone)]
pub struct GenerationInvoker {
    timeout: Duration,
    params: GenerationParams,
}

impl GenerationInvoker {
    pub fn new() -> Self {
        Self::with_config(DEFAULT_TIMEOUT, GenerationParams::default())
    }

    pub fn with_config(timeout: Duration, params: GenerationParams) -> Self {
        Self { timeout, params }
    }

    /// Returns the raw completion text.
    ///
    /// When the deadline passes first the request future is dropped and a
    /// `Timeout` is returned; a late answer is never observed.
    pub async fn invoke(&self, handle: &ModelHandle, prompt: &str) -> Result<String, InvocationError> {
        log::info!(
            "[invoker] Requesting completion from {} (timeout {:?})",
            handle.model_id,
            self.timeout
        );

        match tokio::time::timeout(self.timeout, handle.complete(prompt, &self.params)).await {
            Err(_) => {
                log::warn!("[invoker] {} timed out", handle.model_id);
                Err(InvocationError::Timeout {
                    model_id: handle.model_id.clone(),
                    timeout: self.timeout,
                })
            }
            Ok(Err(e)) if e.kind == ModelErrorKind::QuotaExceeded => {
                log::warn!("[invoker] {} quota exceeded: {}", handle.model_id, e.message);
                Err(InvocationError::QuotaExceeded {
                    model_id: handle.model_id.clone(),
                    message: e.message,
                })
            }
            Ok(Err(e)) => {
                log::warn!("[invoker] {} failed: {}", handle.model_id, e.message);
                Err(InvocationError::Failed {
                    model_id: handle.model_id.clone(),
                    message: e.message,
                })
            }
            Ok(Ok(text)) => {
                log::debug!(
                    "[invoker] {} returned {} characters",
                    handle.model_id,
                    text.chars().count()
                );
                Ok(text)
            }
        }
    }
}

impl Default for GenerationInvoker {
    fn default() -> Self {
        Self::new()
    }
}
