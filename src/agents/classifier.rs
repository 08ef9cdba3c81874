// Provider error classification from error message text

use super::ModelErrorKind;
use regex::Regex;
use std::sync::OnceLock;

// Static patterns for efficient reuse
static PATTERNS: OnceLock<Vec<CompiledPattern>> = OnceLock::new();

struct CompiledPattern {
    regex: Regex,
    kind: ModelErrorKind,
}

fn get_patterns() -> &'static Vec<CompiledPattern> {
    PATTERNS.get_or_init(|| {
        vec![
            // Quota and rate limiting (checked before availability)
            // Word boundary keeps ids like "req_4291" from matching
            CompiledPattern {
                regex: Regex::new(r"\b429\b").unwrap(),
                kind: ModelErrorKind::QuotaExceeded,
            },
            CompiledPattern {
                regex: Regex::new(r"(?i)quota").unwrap(),
                kind: ModelErrorKind::QuotaExceeded,
            },
            CompiledPattern {
                regex: Regex::new(r"(?i)rate[_\-\s]?limit").unwrap(),
                kind: ModelErrorKind::QuotaExceeded,
            },
            CompiledPattern {
                regex: Regex::new(r"(?i)too\s+many\s+requests").unwrap(),
                kind: ModelErrorKind::QuotaExceeded,
            },
            CompiledPattern {
                regex: Regex::new(r"(?i)resource[_\s]+exhausted").unwrap(),
                kind: ModelErrorKind::QuotaExceeded,
            },
            // Unknown or unsupported models
            CompiledPattern {
                regex: Regex::new(r"\b404\b").unwrap(),
                kind: ModelErrorKind::ModelUnavailable,
            },
            CompiledPattern {
                regex: Regex::new(r"(?i)not[_\s]+found").unwrap(),
                kind: ModelErrorKind::ModelUnavailable,
            },
            CompiledPattern {
                regex: Regex::new(r"(?i)not\s+supported").unwrap(),
                kind: ModelErrorKind::ModelUnavailable,
            },
        ]
    })
}

/// Classifies a provider error message into a closed error kind.
///
/// Quota signals win over availability signals; anything unmatched is `Other`.
pub fn classify_message(message: &str) -> ModelErrorKind {
    get_patterns()
        .iter()
        .find(|pattern| pattern.regex.is_match(message))
        .map(|pattern| pattern.kind)
        .unwrap_or(ModelErrorKind::Other)
}

/// Classifies an HTTP status, falling back to the response body text
pub fn classify_status(status: u16, body: &str) -> ModelErrorKind {
    match status {
        429 => ModelErrorKind::QuotaExceeded,
        404 => ModelErrorKind::ModelUnavailable,
        _ => classify_message(body),
    }
}
