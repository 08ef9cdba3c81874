// Template rendering engine using Tera

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::sync::Mutex;
use tera::{Context, Tera};

/// A file of an existing project, as shown in a continuation request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExistingFile {
    pub path: String,
    pub is_folder: bool,
}

/// Variables available to prompt templates
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptContext {
    /// What the user asked for
    pub user_request: String,
    /// Whether the request extends an existing project
    pub is_continuation: bool,
    pub existing_files: Vec<ExistingFile>,
    /// Earlier prompts of the same project, oldest first
    pub history: Vec<String>,
}

impl PromptContext {
    pub fn new(user_request: &str) -> Self {
        Self {
            user_request: user_request.to_string(),
            ..Default::default()
        }
    }

    pub fn with_continuation(mut self, is_continuation: bool) -> Self {
        self.is_continuation = is_continuation;
        self
    }

    pub fn with_existing_files(mut self, files: Vec<ExistingFile>) -> Self {
        self.existing_files = files;
        self
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }

    /// Convert to Tera context
    pub fn to_tera_context(&self) -> Result<Context> {
        Context::from_serialize(self).map_err(|e| anyhow!("Failed to build template context: {}", e))
    }
}

/// Template engine for rendering prompts
pub struct TemplateEngine {
    /// Tera instance with cached templates
    tera: Mutex<Tera>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        // Prompts are plain text, user input must reach the model verbatim
        tera.autoescape_on(vec![]);
        Self {
            tera: Mutex::new(tera),
        }
    }

    /// Add a template from string
    pub fn add_template(&self, name: &str, template: &str) -> Result<()> {
        let mut tera = self.tera.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        tera.add_raw_template(name, template)
            .map_err(|e| anyhow!("Failed to add template '{}': {}", name, e))?;
        Ok(())
    }

    /// Render a template with context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        let tera = self.tera.lock().map_err(|e| anyhow!("Lock error: {}", e))?;
        let ctx = context.to_tera_context()?;
        tera.render(template_name, &ctx)
            .map_err(|e| anyhow!("Failed to render template '{}': {}", template_name, e))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_template_with_request() {
        let engine = TemplateEngine::new();
        engine
            .add_template("t", "Build: {{ user_request }}{% if is_continuation %} (more){% endif %}")
            .unwrap();

        let plain = engine.render("t", &PromptContext::new("a <b> & c")).unwrap();
        assert_eq!(plain, "Build: a <b> & c");

        let more = engine
            .render("t", &PromptContext::new("x").with_continuation(true))
            .unwrap();
        assert_eq!(more, "Build: x (more)");
    }

    #[test]
    fn test_template_lists_existing_files() {
        let engine = TemplateEngine::new();
        let ctx = PromptContext::new("r").with_existing_files(vec![
            ExistingFile {
                path: "src".to_string(),
                is_folder: true,
            },
            ExistingFile {
                path: "src/a.js".to_string(),
                is_folder: false,
            },
        ]);

        engine
            .add_template("files", "{% for f in existing_files %}[{{ f.path }}]{% endfor %}")
            .unwrap();
        let out = engine.render("files", &ctx).unwrap();
        assert_eq!(out, "[src][src/a.js]");
    }

    #[test]
    fn test_unknown_template_is_error() {
        let engine = TemplateEngine::new();
        assert!(engine.render("missing", &PromptContext::new("x")).is_err());
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let engine = TemplateEngine::new();
        assert!(engine.add_template("bad", "{% if %}").is_err());
    }
}
