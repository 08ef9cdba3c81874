// Deterministic fallback projects for failed generations

mod pages;

use crate::models::{FileDescriptor, Manifest};
use chrono::{DateTime, Duration, DurationRound, Utc};

pub const DEFAULT_TITLE: &str = "Generated Project";

const TITLE_MAX_CHARS: usize = 30;

/// Which fallback project to synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// Quota exhausted or no model answered
    ServiceUnavailable,
    /// Anything else that went wrong
    Generic,
}

/// Title derived from a prompt: word characters and whitespace only, at most
/// 30 characters, trimmed
pub fn sanitize_prompt(prompt: &str) -> String {
    prompt
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .take(TITLE_MAX_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Page title for a prompt, never empty
pub fn project_title(prompt: &str) -> String {
    let sanitized = sanitize_prompt(prompt);
    if sanitized.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        sanitized
    }
}

fn fill(template: &str, title: &str, prompt: &str) -> String {
    // Prompt goes last so placeholder text inside it stays literal
    template.replace("{{TITLE}}", title).replace("{{PROMPT}}", prompt)
}

/// Minimal page restating the prompt, with a live clock
pub fn generic_project(prompt: &str) -> Manifest {
    let title = project_title(prompt);
    Manifest::new(vec![
        FileDescriptor::file("index.html", fill(pages::GENERIC_INDEX_HTML, &title, prompt)),
        FileDescriptor::file("styles.css", pages::GENERIC_STYLES_CSS),
        FileDescriptor::file("main.js", pages::GENERIC_MAIN_JS),
    ])
}

/// Page explaining that the model service is out of quota or unreachable
pub fn service_unavailable_project(prompt: &str) -> Manifest {
    let title = project_title(prompt);
    Manifest::new(vec![
        FileDescriptor::file(
            "index.html",
            fill(pages::UNAVAILABLE_INDEX_HTML, &title, prompt),
        ),
        FileDescriptor::file("styles.css", pages::UNAVAILABLE_STYLES_CSS),
        FileDescriptor::file("main.js", pages::UNAVAILABLE_MAIN_JS),
    ])
}

pub fn synthesize(kind: FallbackKind, prompt: &str) -> Manifest {
    log::info!("[fallback] Emitting {:?} project", kind);
    match kind {
        FallbackKind::ServiceUnavailable => service_unavailable_project(prompt),
        FallbackKind::Generic => generic_project(prompt),
    }
}

/// Next full hour strictly after `now`, when quotas are assumed to reset
pub fn likely_quota_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let hour = Duration::hours(1);
    let floor = now.duration_trunc(hour).unwrap_or(now);
    floor + hour
}
