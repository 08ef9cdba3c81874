// Recovery pipeline for model output - cleaning, extraction, validation, ordering

pub mod cleaner;
pub mod ordering;
pub mod structured;
pub mod textual;
pub mod validator;

pub use cleaner::clean;
pub use ordering::order_manifest;
pub use validator::validate;

use crate::models::{GenerationStage, Manifest, RawDescriptor, StageTracker, StateTransitionError};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("No JSON array found in model output")]
    NoArrayFound,

    #[error("JSON array in model output is never closed")]
    UnbalancedArray,

    #[error("Structured extraction failed: {0}")]
    StructuredExtractionFailed(String),

    #[error("Invalid file descriptor at index {index}: {reason}")]
    InvalidDescriptor { index: usize, reason: String },

    #[error("No files could be recovered from model output")]
    EmptyRecovery,

    #[error(transparent)]
    Stage(#[from] StateTransitionError),
}

/// Independent ways of turning raw model output into candidate descriptors,
/// tried in `CASCADE` order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Clean the array, parse strictly, recover objects on parse failure
    Structured,
    /// Salvage complete objects from an array cut off before its end
    TruncatedArray,
    /// Fenced code blocks, then filename mentions, over the raw text
    Textual,
}

impl ExtractionStrategy {
    pub const CASCADE: [ExtractionStrategy; 3] = [
        ExtractionStrategy::Structured,
        ExtractionStrategy::TruncatedArray,
        ExtractionStrategy::Textual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStrategy::Structured => "structured",
            ExtractionStrategy::TruncatedArray => "truncated-array",
            ExtractionStrategy::Textual => "textual",
        }
    }

    /// Runs this strategy over raw model output. `Ok` with an empty list
    /// means the strategy found nothing.
    pub fn extract(&self, raw: &str) -> Result<Vec<RawDescriptor>, RecoveryError> {
        match self {
            ExtractionStrategy::Structured => {
                let cleaned = cleaner::clean(raw)?;
                log::debug!("[recovery] Cleaned array: {}", preview(&cleaned));
                structured::extract_structured(&cleaned)
            }
            ExtractionStrategy::TruncatedArray => match cleaner::isolate_array(raw) {
                Err(RecoveryError::UnbalancedArray) => Ok(structured::extract_truncated(raw)),
                _ => Ok(Vec::new()),
            },
            ExtractionStrategy::Textual => Ok(textual::extract_from_text(raw)),
        }
    }
}

/// Recovers an ordered manifest from raw model output.
///
/// Strategies run in cascade order. The first one producing a non-empty
/// batch that passes validation wins; a rejected batch moves on to the
/// next strategy. Stage changes are recorded on `tracker`, which is left
/// in `Ordering` on success and in `Extracting` on failure.
pub fn recover_manifest(raw: &str, tracker: &mut StageTracker) -> Result<Manifest, RecoveryError> {
    tracker.advance(GenerationStage::Extracting)?;

    for strategy in ExtractionStrategy::CASCADE {
        let candidates = match strategy.extract(raw) {
            Ok(candidates) if !candidates.is_empty() => candidates,
            Ok(_) => {
                log::debug!("[recovery] {} extraction found nothing", strategy.as_str());
                continue;
            }
            Err(e) => {
                log::warn!("[recovery] {} extraction failed: {}", strategy.as_str(), e);
                continue;
            }
        };

        tracker.advance(GenerationStage::Validating)?;
        match validator::validate(candidates) {
            Ok(manifest) => {
                tracker.advance(GenerationStage::Ordering)?;
                log::info!(
                    "[recovery] Recovered {} entries via {} extraction",
                    manifest.len(),
                    strategy.as_str()
                );
                return Ok(order_manifest(manifest));
            }
            Err(e) => {
                log::warn!("[recovery] {} batch rejected: {}", strategy.as_str(), e);
                tracker.advance(GenerationStage::Extracting)?;
            }
        }
    }

    Err(RecoveryError::EmptyRecovery)
}

/// Runs only the recovery stages over saved model output
pub fn recover(raw: &str) -> Result<Manifest, RecoveryError> {
    let mut tracker = StageTracker::starting_at(GenerationStage::Extracting);
    let manifest = recover_manifest(raw, &mut tracker)?;
    tracker.advance(GenerationStage::Done)?;
    Ok(manifest)
}

/// First 100 characters of `text`, for log lines
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(100).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
