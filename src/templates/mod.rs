// Prompt composition for generation and continuation requests

pub mod builtin;
pub mod engine;

pub use builtin::CONTINUATION_MARKER;
pub use engine::{ExistingFile, PromptContext, TemplateEngine};

use crate::models::Manifest;
use anyhow::Result;

/// Renders the prompts sent to the model from the built-in templates
pub struct PromptComposer {
    engine: TemplateEngine,
}

impl PromptComposer {
    pub fn new() -> Result<Self> {
        let engine = TemplateEngine::new();
        for (name, template) in builtin::get_builtin_templates() {
            engine.add_template(name, template)?;
        }
        Ok(Self { engine })
    }

    /// Wraps a user request in the generation instructions.
    ///
    /// Requests that carry the continuation marker get the extra guidance
    /// for extending an existing project.
    pub fn generation_prompt(&self, user_request: &str) -> Result<String> {
        let context = PromptContext::new(user_request)
            .with_continuation(is_continuation(user_request));
        self.engine.render(builtin::GENERATION_PROMPT, &context)
    }

    /// Builds the request text for extending an already generated project
    pub fn continuation_request(
        &self,
        existing: &Manifest,
        history: &[String],
        request: &str,
    ) -> Result<String> {
        let files = existing
            .iter()
            .map(|d| ExistingFile {
                path: d.path.clone(),
                is_folder: d.is_folder(),
            })
            .collect();

        let context = PromptContext::new(request)
            .with_continuation(true)
            .with_existing_files(files)
            .with_history(history.to_vec());
        self.engine.render(builtin::CONTINUATION_REQUEST, &context)
    }
}

pub fn is_continuation(user_request: &str) -> bool {
    user_request.contains(CONTINUATION_MARKER)
}
