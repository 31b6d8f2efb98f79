// Document generation engine.
// Implements: content providers, concurrent orchestration, template assembly, sanitization.
// All LLM calls go through the `ContentGenerator` capability — no direct API calls here.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod sanitizer;
pub mod template;

use thiserror::Error;

use crate::generation::sanitizer::SanitizeError;
use crate::generation::template::TemplateError;
use crate::llm_client::LlmError;

/// Why a document could not be produced. No partial document accompanies any variant.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{section} generation failed: {source}")]
    GenerationFailure {
        section: &'static str,
        #[source]
        source: LlmError,
    },

    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    #[error("sanitization failed: {0}")]
    Sanitization(#[from] SanitizeError),
}
