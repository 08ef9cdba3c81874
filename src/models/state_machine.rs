// Generation pipeline stage machine with validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    Idle,
    Negotiating,
    Invoking,
    Extracting,
    Validating,
    Ordering,
    Done,
    FallbackEmitted,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateTransitionError {
    #[error("Invalid stage transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: GenerationStage,
        to: GenerationStage,
    },

    #[error("Pipeline already in terminal stage: {0:?}")]
    AlreadyTerminal(GenerationStage),
}

/// Validates if the pipeline can move from one stage to another
pub fn can_transition(from: GenerationStage, to: GenerationStage) -> bool {
    use GenerationStage::*;

    match (from, to) {
        (Idle, Negotiating) => true,

        (Negotiating, Invoking) => true,
        (Negotiating, FallbackEmitted) => true, // No model answered

        (Invoking, Extracting) => true,
        (Invoking, FallbackEmitted) => true, // Timeout, quota, provider error

        (Extracting, Validating) => true,
        (Extracting, FallbackEmitted) => true, // Nothing recoverable

        (Validating, Ordering) => true,
        (Validating, Extracting) => true, // Next strategy after a rejected batch
        (Validating, FallbackEmitted) => true,

        (Ordering, Done) => true,

        // Terminal stages never move
        (Done, _) | (FallbackEmitted, _) => false,

        // Re-entering the current stage is a no-op
        (a, b) if a == b => true,

        _ => false,
    }
}

/// Validates and performs a stage transition
pub fn transition_stage(
    current: GenerationStage,
    target: GenerationStage,
) -> Result<GenerationStage, StateTransitionError> {
    if is_terminal_stage(current) {
        return Err(StateTransitionError::AlreadyTerminal(current));
    }

    if !can_transition(current, target) {
        return Err(StateTransitionError::InvalidTransition {
            from: current,
            to: target,
        });
    }

    Ok(target)
}

pub fn is_terminal_stage(stage: GenerationStage) -> bool {
    matches!(stage, GenerationStage::Done | GenerationStage::FallbackEmitted)
}

/// Tracks the current stage of one generation call and the stages it passed through
#[derive(Debug, Clone)]
pub struct StageTracker {
    current: GenerationStage,
    trail: Vec<GenerationStage>,
}

impl StageTracker {
    pub fn new() -> Self {
        Self::starting_at(GenerationStage::Idle)
    }

    /// Starts mid-pipeline, used when only the recovery stages run
    pub fn starting_at(stage: GenerationStage) -> Self {
        Self {
            current: stage,
            trail: vec![stage],
        }
    }

    pub fn current(&self) -> GenerationStage {
        self.current
    }

    pub fn trail(&self) -> &[GenerationStage] {
        &self.trail
    }

    pub fn advance(&mut self, target: GenerationStage) -> Result<(), StateTransitionError> {
        let next = transition_stage(self.current, target)?;
        if next != self.current {
            log::debug!("[pipeline] {:?} -> {:?}", self.current, next);
            self.current = next;
            self.trail.push(next);
        }
        Ok(())
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GenerationStage::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [Idle, Negotiating, Invoking, Extracting, Validating, Ordering, Done];
        for pair in path.windows(2) {
            assert!(can_transition(pair[0], pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_fallback_reachable_from_failing_stages() {
        for stage in [Negotiating, Invoking, Extracting, Validating] {
            assert!(can_transition(stage, FallbackEmitted));
        }
        assert!(!can_transition(Idle, FallbackEmitted));
        assert!(!can_transition(Ordering, FallbackEmitted));
    }

    #[test]
    fn test_validating_can_return_to_extracting() {
        assert!(can_transition(Validating, Extracting));
    }

    #[test]
    fn test_cannot_skip_stages() {
        assert!(!can_transition(Idle, Invoking));
        assert!(!can_transition(Negotiating, Extracting));
        assert!(!can_transition(Extracting, Ordering));
        let result = transition_stage(Invoking, Done);
        assert_eq!(
            result,
            Err(StateTransitionError::InvalidTransition {
                from: Invoking,
                to: Done
            })
        );
    }

    #[test]
    fn test_terminal_stages_are_absorbing() {
        assert!(!can_transition(Done, Done));
        assert!(!can_transition(FallbackEmitted, Idle));
        assert_eq!(
            transition_stage(FallbackEmitted, FallbackEmitted),
            Err(StateTransitionError::AlreadyTerminal(FallbackEmitted))
        );
    }

    #[test]
    fn test_tracker_records_trail_without_repeats() {
        let mut tracker = StageTracker::new();
        tracker.advance(Negotiating).unwrap();
        tracker.advance(Invoking).unwrap();
        tracker.advance(Extracting).unwrap();
        tracker.advance(Extracting).unwrap();
        tracker.advance(FallbackEmitted).unwrap();

        assert_eq!(
            tracker.trail(),
            &[Idle, Negotiating, Invoking, Extracting, FallbackEmitted]
        );
        assert!(is_terminal_stage(tracker.current()));
        assert!(tracker.advance(Done).is_err());
    }
}
