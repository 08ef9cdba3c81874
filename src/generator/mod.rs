// Generation orchestrator - negotiate, invoke, recover, fall back

use crate::agents::{
    GeminiClient, GenerationInvoker, InvocationError, ModelBackend, ModelNegotiator,
    NegotiationError, ProbeFailure,
};
use crate::config::GeneratorConfig;
use crate::fallback::{self, FallbackKind};
use crate::models::{
    GenerationOutcome, GenerationStage, Manifest, StageTracker, StateTransitionError,
};
use crate::parsers::{self, RecoveryError};
use crate::templates::PromptComposer;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No API key configured (use --api-key, GOOGLE_API_KEY or GEMINI_API_KEY)")]
    MissingCredential,

    #[error("Failed to set up model backend: {0}")]
    Backend(String),

    #[error(transparent)]
    NoModelAvailable(#[from] NegotiationError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    #[error("Failed to compose prompt: {0}")]
    Prompt(String),

    #[error(transparent)]
    Stage(#[from] StateTransitionError),
}

impl GenerationError {
    /// Which fallback project answers this failure
    pub fn fallback_kind(&self) -> FallbackKind {
        match self {
            GenerationError::NoModelAvailable(_) => FallbackKind::ServiceUnavailable,
            GenerationError::Invocation(e) if e.is_quota() => FallbackKind::ServiceUnavailable,
            _ => FallbackKind::Generic,
        }
    }

    fn into_outcome(self) -> GenerationOutcome {
        match self.fallback_kind() {
            FallbackKind::ServiceUnavailable => GenerationOutcome::QuotaExceeded(self.to_string()),
            FallbackKind::Generic => GenerationOutcome::Other(self.to_string()),
        }
    }
}

/// Where the files of a report came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Model { model_id: String },
    GenericFallback { reason: String },
    ServiceUnavailableFallback { reason: String },
}

impl ManifestSource {
    pub fn is_fallback(&self) -> bool {
        !matches!(self, ManifestSource::Model { .. })
    }
}

/// Everything known about one generation call
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub manifest: Manifest,
    pub source: ManifestSource,
    pub probe_failures: Vec<ProbeFailure>,
    pub stages: Vec<GenerationStage>,
    /// Set for service-unavailable results
    pub retry_after: Option<DateTime<Utc>>,
}

/// Turns a prompt into a project manifest, always producing one
pub struct CodeGenerator {
    backend: Arc<dyn ModelBackend>,
    negotiator: ModelNegotiator,
    invoker: GenerationInvoker,
    composer: PromptComposer,
}

impl CodeGenerator {
    /// Builds a generator talking to Gemini.
    ///
    /// A missing API key is reported here, before any model is contacted.
    pub fn from_config(
        config: &GeneratorConfig,
        api_key: Option<&str>,
    ) -> Result<Self, GenerationError> {
        Self::with_api_key(config, config.resolve_api_key(api_key))
    }

    pub fn with_api_key(
        config: &GeneratorConfig,
        api_key: Option<String>,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key.ok_or(GenerationError::MissingCredential)?;

        let client = GeminiClient::with_base_url(
            api_key,
            config.api_base_url.clone(),
            config.http_timeout(),
        )
        .map_err(|e| GenerationError::Backend(e.to_string()))?
        .with_probe_prompt(config.probe_prompt.clone());

        Self::with_backend(Arc::new(client), config)
    }

    pub fn with_backend(
        backend: Arc<dyn ModelBackend>,
        config: &GeneratorConfig,
    ) -> Result<Self, GenerationError> {
        let composer = PromptComposer::new().map_err(|e| GenerationError::Prompt(e.to_string()))?;

        Ok(Self {
            backend,
            negotiator: ModelNegotiator::new(config.models.clone()),
            invoker: GenerationInvoker::with_config(config.timeout(), config.generation.clone()),
            composer,
        })
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// Generates a project for `prompt`, falling back to a synthesized one
    pub async fn generate(&self, prompt: &str) -> Manifest {
        self.generate_detailed(prompt).await.manifest
    }

    pub async fn generate_detailed(&self, prompt: &str) -> GenerationReport {
        let mut tracker = StageTracker::new();
        let mut probe_failures = Vec::new();
        let mut model_id = None;

        let outcome = match self.run(prompt, &mut tracker, &mut probe_failures).await {
            Ok((model, manifest)) => {
                model_id = Some(model);
                GenerationOutcome::Success(manifest)
            }
            Err(e) => {
                log::error!("[generator] Generation failed: {}", e);
                e.into_outcome()
            }
        };

        let terminal = if outcome.is_success() {
            GenerationStage::Done
        } else {
            GenerationStage::FallbackEmitted
        };
        if let Err(e) = tracker.advance(terminal) {
            log::warn!("[generator] {}", e);
        }

        let (manifest, source, retry_after) = match outcome {
            GenerationOutcome::Success(manifest) => (
                manifest,
                ManifestSource::Model {
                    model_id: model_id.unwrap_or_default(),
                },
                None,
            ),
            GenerationOutcome::QuotaExceeded(reason) => (
                fallback::synthesize(FallbackKind::ServiceUnavailable, prompt),
                ManifestSource::ServiceUnavailableFallback { reason },
                Some(fallback::likely_quota_reset(Utc::now())),
            ),
            GenerationOutcome::Other(reason) => (
                fallback::synthesize(FallbackKind::Generic, prompt),
                ManifestSource::GenericFallback { reason },
                None,
            ),
        };

        GenerationReport {
            manifest,
            source,
            probe_failures,
            stages: tracker.trail().to_vec(),
            retry_after,
        }
    }

    async fn run(
        &self,
        prompt: &str,
        tracker: &mut StageTracker,
        probe_failures: &mut Vec<ProbeFailure>,
    ) -> Result<(String, Manifest), GenerationError> {
        tracker.advance(GenerationStage::Negotiating)?;
        let negotiated = match self.negotiator.negotiate(Arc::clone(&self.backend)).await {
            Ok(negotiated) => negotiated,
            Err(NegotiationError::NoModelAvailable { failures }) => {
                probe_failures.extend(failures.iter().cloned());
                return Err(NegotiationError::NoModelAvailable { failures }.into());
            }
        };
        probe_failures.extend(negotiated.failures);
        let handle = negotiated.handle;

        tracker.advance(GenerationStage::Invoking)?;
        let full_prompt = self
            .composer
            .generation_prompt(prompt)
            .map_err(|e| GenerationError::Prompt(e.to_string()))?;
        let raw = self.invoker.invoke(&handle, &full_prompt).await?;
        log::debug!("[generator] Raw completion: {}", parsers::preview(&raw));

        let manifest = parsers::recover_manifest(&raw, tracker)?;
        Ok((handle.model_id, manifest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::invoker::DEFAULT_TIMEOUT;

    #[test]
    fn test_fallback_kind_selection() {
        let no_model = GenerationError::NoModelAvailable(NegotiationError::NoModelAvailable {
            failures: Vec::new(),
        });
        assert_eq!(no_model.fallback_kind(), FallbackKind::ServiceUnavailable);

        let quota = GenerationError::Invocation(InvocationError::QuotaExceeded {
            model_id: "m".to_string(),
            message: "429".to_string(),
        });
        assert_eq!(quota.fallback_kind(), FallbackKind::ServiceUnavailable);

        let timeout = GenerationError::Invocation(InvocationError::Timeout {
            model_id: "m".to_string(),
            timeout: DEFAULT_TIMEOUT,
        });
        assert_eq!(timeout.fallback_kind(), FallbackKind::Generic);

        let empty = GenerationError::Recovery(RecoveryError::EmptyRecovery);
        assert_eq!(empty.fallback_kind(), FallbackKind::Generic);
    }

    #[test]
    fn test_missing_credential_is_fatal() {
        let config = GeneratorConfig::default();
        assert!(matches!(
            CodeGenerator::with_api_key(&config, None),
            Err(GenerationError::MissingCredential)
        ));
    }

    #[test]
    fn test_explicit_key_builds_generator() {
        let config = GeneratorConfig::default();
        assert!(CodeGenerator::from_config(&config, Some("key")).is_ok());
    }
}
