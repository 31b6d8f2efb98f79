//! In-memory job store for background document generation.
//!
//! `submit` returns an id immediately and runs the orchestrator on a spawned task.
//! The store owns the id → state map; nothing else mutates it. State lives only
//! for the lifetime of the process.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{error, info};
use uuid::Uuid;

use crate::generation::orchestrator::generate_document;
use crate::generation::template::DocumentTemplate;
use crate::generation::DocumentError;
use crate::llm_client::ContentGenerator;
use crate::models::document::DocumentRequest;

const GENERATION_FAILED_MESSAGE: &str = "Document generation failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Ready(String),
    /// Client-facing failure reason. Upstream error details only go to the log.
    Failed(String),
}

#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<DashMap<Uuid, JobState>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending job and starts generating it in the background.
    pub fn submit(
        &self,
        request: DocumentRequest,
        llm: Arc<dyn ContentGenerator>,
        template: Arc<DocumentTemplate>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.jobs.insert(id, JobState::Pending);
        info!("Document job {id} submitted for {:?}", request.project_name);

        let jobs = Arc::clone(&self.jobs);
        tokio::spawn(async move {
            // Generation runs on its own task so a panic surfaces as a JoinError here
            // instead of leaving the job pending.
            let generation = tokio::spawn(async move {
                generate_document(&request, llm.as_ref(), &template).await
            });
            let state = match generation.await {
                Ok(Ok(document)) => {
                    info!("Document job {id} ready");
                    JobState::Ready(document)
                }
                Ok(Err(e)) => {
                    error!("Document job {id} failed: {e}");
                    JobState::Failed(failure_message(&e))
                }
                Err(e) => {
                    error!("Document job {id} aborted: {e}");
                    JobState::Failed(GENERATION_FAILED_MESSAGE.to_string())
                }
            };
            jobs.insert(id, state);
        });

        id
    }

    pub fn get(&self, id: &Uuid) -> Option<JobState> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }
}

fn failure_message(error: &DocumentError) -> String {
    match error {
        DocumentError::GenerationFailure { section, .. } => {
            format!("{GENERATION_FAILED_MESSAGE}: {section} section unavailable")
        }
        _ => GENERATION_FAILED_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::generation::prompts::ZONING_SYSTEM;
    use crate::generation::test_support::{sample_request, StubGenerator};
    use crate::llm_client::LlmError;

    struct PanickingGenerator;

    #[async_trait]
    impl ContentGenerator for PanickingGenerator {
        async fn generate(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            panic!("generator blew up");
        }
    }

    /// Polls until the job leaves `Pending`, bounded so a hung job fails the test.
    async fn wait_for_completion(store: &JobStore, id: &Uuid) -> JobState {
        for _ in 0..200 {
            match store.get(id) {
                Some(JobState::Pending) => tokio::time::sleep(Duration::from_millis(10)).await,
                Some(state) => return state,
                None => panic!("job {id} disappeared"),
            }
        }
        panic!("job {id} never completed");
    }

    fn template() -> Arc<DocumentTemplate> {
        Arc::new(DocumentTemplate::builtin().unwrap())
    }

    #[tokio::test]
    async fn test_unknown_id_is_absent() {
        let store = JobStore::new();
        assert_eq!(store.get(&Uuid::new_v4()), None);
    }

    #[tokio::test]
    async fn test_job_is_pending_until_generation_completes() {
        let gate = Arc::new(Semaphore::new(0));
        let llm = Arc::new(StubGenerator::replying("<p>content</p>").gated(Arc::clone(&gate)));
        let store = JobStore::new();

        let id = store.submit(sample_request("Commercial"), llm, template());
        assert_eq!(store.get(&id), Some(JobState::Pending));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.get(&id), Some(JobState::Pending));

        gate.add_permits(4);
        match wait_for_completion(&store, &id).await {
            JobState::Ready(document) => assert!(document.contains("<p>content</p>")),
            other => panic!("expected ready document, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ready_document_is_stable_across_reads() {
        let llm = Arc::new(StubGenerator::replying("<p>content</p>"));
        let store = JobStore::new();

        let id = store.submit(sample_request("Residential"), llm, template());
        let first = wait_for_completion(&store, &id).await;
        assert!(matches!(first, JobState::Ready(_)));
        assert_eq!(store.get(&id), Some(first));
    }

    #[tokio::test]
    async fn test_failed_generation_is_recorded_distinctly() {
        let llm = Arc::new(StubGenerator::replying("<p>content</p>").failing_on(ZONING_SYSTEM));
        let store = JobStore::new();

        let id = store.submit(sample_request("Commercial"), llm, template());
        match wait_for_completion(&store, &id).await {
            JobState::Failed(reason) => {
                assert!(reason.contains("zoning"));
                assert!(!reason.contains("stubbed outage"), "upstream error leaked: {reason}");
                assert!(!reason.contains("503"), "upstream error leaked: {reason}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_panicking_generation_marks_job_failed() {
        let store = JobStore::new();

        let id = store.submit(
            sample_request("Commercial"),
            Arc::new(PanickingGenerator),
            template(),
        );
        assert_eq!(
            wait_for_completion(&store, &id).await,
            JobState::Failed(GENERATION_FAILED_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_each_submission_gets_its_own_id() {
        let llm: Arc<dyn ContentGenerator> = Arc::new(StubGenerator::replying("<p>x</p>"));
        let store = JobStore::new();

        let a = store.submit(sample_request("Commercial"), Arc::clone(&llm), template());
        let b = store.submit(sample_request("Commercial"), llm, template());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}
