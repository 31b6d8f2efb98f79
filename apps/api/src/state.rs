use std::sync::Arc;

use crate::config::Config;
use crate::generation::template::DocumentTemplate;
use crate::jobs::JobStore;
use crate::llm_client::ContentGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation capability. `LlmClient` in production, stubs in tests.
    pub llm: Arc<dyn ContentGenerator>,
    /// Compiled once at startup; a broken template never reaches a request.
    pub template: Arc<DocumentTemplate>,
    pub jobs: JobStore,
    pub config: Arc<Config>,
}
