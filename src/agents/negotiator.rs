// Model negotiation - sequential probing of candidate models

use super::{ModelBackend, ModelErrorKind, ModelHandle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Record of a candidate model that failed its probe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeFailure {
    pub model_id: String,
    pub kind: ModelErrorKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Error)]
pub enum NegotiationError {
    #[error("No candidate model is available ({} probed)", failures.len())]
    NoModelAvailable { failures: Vec<ProbeFailure> },
}

/// The first model that answered, with the failures seen before it
#[derive(Debug, Clone)]
pub struct NegotiatedModel {
    pub handle: ModelHandle,
    pub failures: Vec<ProbeFailure>,
}

/// Walks an ordered list of candidate models and picks the first that answers
pub struct ModelNegotiator {
    candidates: Vec<String>,
}

impl ModelNegotiator {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// Probes candidates one at a time, in order.
    ///
    /// Every failure is recorded and the next candidate tried, whatever its
    /// kind. Only when the list is exhausted does negotiation fail.
    pub async fn negotiate(
        &self,
        backend: Arc<dyn ModelBackend>,
    ) -> Result<NegotiatedModel, NegotiationError> {
        let mut failures = Vec::new();

        for model_id in &self.candidates {
            log::debug!("[negotiator] Probing {} via {}", model_id, backend.name());

            match backend.probe(model_id).await {
                Ok(()) => {
                    log::info!("[negotiator] Using model {}", model_id);
                    return Ok(NegotiatedModel {
                        handle: ModelHandle::new(model_id.clone(), Arc::clone(&backend)),
                        failures,
                    });
                }
                Err(e) => {
                    match e.kind {
                        ModelErrorKind::QuotaExceeded => {
                            log::warn!("[negotiator] Quota exceeded for {}: {}", model_id, e.message)
                        }
                        ModelErrorKind::ModelUnavailable => {
                            log::warn!("[negotiator] Model {} unavailable: {}", model_id, e.message)
                        }
                        ModelErrorKind::Other => {
                            log::warn!("[negotiator] Probe of {} failed: {}", model_id, e.message)
                        }
                    }
                    failures.push(ProbeFailure {
                        model_id: model_id.clone(),
                        kind: e.kind,
                        message: e.message,
                        timestamp: Utc::now(),
                    });
                }
            }
        }

        log::error!(
            "[negotiator] All {} candidate models failed",
            self.candidates.len()
        );
        Err(NegotiationError::NoModelAvailable { failures })
    }
}
