pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // Document API
        .route("/generate", post(handlers::handle_generate))
        .route("/document/:id", get(handlers::handle_get_document))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tokio::sync::Semaphore;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::generation::prompts::{GENERAL_STANDARDS_SYSTEM, HEADER_SYSTEM};
    use crate::generation::template::DocumentTemplate;
    use crate::generation::test_support::StubGenerator;
    use crate::jobs::JobStore;
    use crate::llm_client::{ContentGenerator, DEFAULT_MODEL};

    fn app(llm: StubGenerator) -> Router {
        let llm: Arc<dyn ContentGenerator> = Arc::new(llm);
        build_router(AppState {
            llm,
            template: Arc::new(DocumentTemplate::builtin().unwrap()),
            jobs: JobStore::new(),
            config: Arc::new(Config {
                anthropic_api_key: "test-key".to_string(),
                llm_model: DEFAULT_MODEL.to_string(),
                llm_timeout: Duration::from_secs(5),
                template_path: None,
                port: 0,
                rust_log: "info".to_string(),
            }),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_generate(payload: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    fn get_document(id: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/document/{id}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn submit(app: &Router) -> String {
        let response = send(
            app,
            post_generate(json!({
                "project_name": "Test Project",
                "project_type": "Commercial",
                "location": "Test City"
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        body["document_id"].as_str().unwrap().to_string()
    }

    /// Polls the document endpoint until it stops answering 202.
    async fn poll_until_done(app: &Router, id: &str) -> Response {
        for _ in 0..200 {
            let response = send(app, get_document(id)).await;
            if response.status() != StatusCode::ACCEPTED {
                return response;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("document {id} was not ready in time");
    }

    #[tokio::test]
    async fn test_document_generation_flow() {
        let app = app(
            StubGenerator::replying("<p>Generated content.</p>")
                .with_reply(HEADER_SYSTEM, "<p>Dummy Document</p>"),
        );

        let id = submit(&app).await;
        let response = poll_until_done(&app, &id).await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let html = body_text(response).await;
        assert!(html.contains("<p>Dummy Document</p>"));
        assert!(html.contains("Test Project"));
        assert!(html.contains("Test City"));
    }

    #[tokio::test]
    async fn test_get_unknown_document_id_is_not_found() {
        let app = app(StubGenerator::replying("<p>x</p>"));

        for id in ["nonexistent-id".to_string(), uuid::Uuid::new_v4().to_string()] {
            let response = send(&app, get_document(&id)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert!(body_text(response).await.to_lowercase().contains("not found"));
        }
    }

    #[tokio::test]
    async fn test_pending_document_returns_accepted() {
        let gate = Arc::new(Semaphore::new(0));
        let app = app(StubGenerator::replying("<p>x</p>").gated(Arc::clone(&gate)));

        let id = submit(&app).await;
        let response = send(&app, get_document(&id)).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "pending");

        gate.add_permits(4);
        assert_eq!(poll_until_done(&app, &id).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failed_generation_is_reported() {
        let app = app(StubGenerator::replying("<p>x</p>").failing_on(GENERAL_STANDARDS_SYSTEM));

        let id = submit(&app).await;
        let response = poll_until_done(&app, &id).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["code"], "GENERATION_FAILED");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("general"));
        assert!(!message.contains("stubbed outage"));
    }

    #[tokio::test]
    async fn test_blank_project_name_is_rejected() {
        let app = app(StubGenerator::replying("<p>x</p>"));

        let response = send(&app, post_generate(json!({ "project_name": "  " }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_project_name_is_rejected() {
        let app = app(StubGenerator::replying("<p>x</p>"));

        let response = send(&app, post_generate(json!({ "project_type": "Commercial" }))).await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let app = app(StubGenerator::replying("<p>x</p>"));

        let response = send(
            &app,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["jobs"], 0);
    }
}
