pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::render::handlers as render;
use crate::state::AppState;
use crate::storage::handlers as storage;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/v1/resumes/generate", post(generation::handle_generate))
        .route("/api/v1/resumes/refine", post(generation::handle_refine))
        // Presentation / export
        .route("/api/v1/resumes/render", post(render::handle_render))
        .route("/api/v1/export/pdf", post(render::handle_export_pdf))
        .route("/api/v1/export/docx", post(render::handle_export_docx))
        // About Me and history
        .route(
            "/api/v1/about-me",
            get(storage::handle_get_about_me).put(storage::handle_put_about_me),
        )
        .route(
            "/api/v1/history",
            get(storage::handle_list_history).post(storage::handle_append_history),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::generation::client::{GenerationClient, GenerationSettings};
    use crate::generation::prompts::PromptBuilder;
    use crate::generation::service::GenerationService;
    use crate::generation::testing::{sample_resume_json, Reply, ScriptedProvider};
    use crate::render::Exporter;
    use crate::storage::{self, MemoryStore};

    fn app_with(replies: Vec<Reply>, timeout: Duration) -> (Router, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new(replies));
        let client = GenerationClient::new(
            provider.clone(),
            GenerationSettings {
                timeout,
                ..Default::default()
            },
        );
        let (about_me, history) = storage::shared(MemoryStore::default());
        let state = AppState {
            generator: Arc::new(GenerationService::new(PromptBuilder::default(), client)),
            about_me,
            history,
            exporter: Exporter::new("cp {input} {output}", "cp {input} {output}"),
        };
        (build_router(state), provider)
    }

    fn app(replies: Vec<Reply>) -> (Router, Arc<ScriptedProvider>) {
        app_with(replies, Duration::from_secs(30))
    }

    async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<Value>) -> axum::response::Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = send_raw(app, method, uri, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app(vec![]);
        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_generate_uses_saved_about_me_when_omitted() {
        let (app, provider) = app(vec![Reply::json(sample_resume_json())]);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/api/v1/about-me",
            Some(json!({"content": "Six years of Rust at Acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/generate",
            Some(json!({"targetText": "Senior Rust Engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"]["name"], "Ada Lovelace");
        assert!(provider.user_prompts()[0].contains("Six years of Rust at Acme"));
    }

    #[tokio::test]
    async fn test_generate_without_any_about_me_is_missing_input() {
        let (app, provider) = app(vec![]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/generate",
            Some(json!({"targetText": "Senior Rust Engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_INPUT");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_with_blank_target_is_missing_input() {
        let (app, _) = app(vec![]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/generate",
            Some(json!({"targetText": "  ", "aboutMe": "I write Rust"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_INPUT");
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_falls_back_to_json_mode() {
        let (app, provider) = app(vec![
            Reply::Text("not json at all".to_string()),
            Reply::Text(format!("```json\n{}\n```", sample_resume_json())),
        ]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/generate",
            Some(json!({"targetText": "job", "aboutMe": "me"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"]["certifications"], json!(["CKA"]));
        assert_eq!(provider.schema_flags(), vec![true, false]);
    }

    #[tokio::test]
    async fn test_unparseable_output_is_bad_gateway() {
        let (app, _) = app(vec![
            Reply::Text("nope".to_string()),
            Reply::Text("still nope".to_string()),
        ]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/generate",
            Some(json!({"targetText": "job", "aboutMe": "me"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "INVALID_MODEL_OUTPUT");
        assert!(!body["error"].as_str().unwrap().contains("still nope"));
    }

    #[tokio::test]
    async fn test_nameless_output_is_bad_gateway_not_a_resume() {
        let (app, _) = app(vec![Reply::json(json!({}))]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/generate",
            Some(json!({"targetText": "job", "aboutMe": "me"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "INVALID_MODEL_OUTPUT");
        assert!(body.get("resume").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_timeout_is_gateway_timeout() {
        let (app, _) = app_with(vec![Reply::Hang], Duration::from_secs(5));
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/generate",
            Some(json!({"targetText": "job", "aboutMe": "me"})),
        )
        .await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["code"], "GENERATION_TIMEOUT");
    }

    #[tokio::test]
    async fn test_refine_with_malformed_resume_is_rejected() {
        let (app, provider) = app(vec![]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/refine",
            Some(json!({"resume": "just a string", "feedback": "condense"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_RESUME");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_refine_returns_new_resume() {
        let mut condensed = sample_resume_json();
        condensed["summary"] = json!("Rust backend engineer.");
        let (app, _) = app(vec![Reply::json(condensed)]);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/refine",
            Some(json!({"resume": sample_resume_json(), "feedback": "shorter summary"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"]["summary"], "Rust backend engineer.");
    }

    #[tokio::test]
    async fn test_render_normalizes_partial_resume() {
        let (app, _) = app(vec![]);
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/resumes/render",
            Some(json!({"resume": {"name": "Ada Lovelace"}})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let html = body["html"].as_str().unwrap();
        assert!(html.contains("Ada Lovelace"));
        assert!(!html.contains("<h2>Experience</h2>"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_export_returns_document_bytes() {
        let (app, _) = app(vec![]);
        let response = send_raw(
            &app,
            Method::POST,
            "/api/v1/export/docx",
            Some(json!({"html": "<p>resume</p>"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .contains("wordprocessingml"));
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("resume.docx"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<p>resume</p>");
    }

    #[tokio::test]
    async fn test_export_requires_html() {
        let (app, _) = app(vec![]);
        let (status, body) = send(&app, Method::POST, "/api/v1/export/pdf", Some(json!({"html": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_history_lists_oldest_first() {
        let (app, _) = app(vec![]);
        for (target, html) in [("first job", "<p>1</p>"), ("second job", "<p>2</p>")] {
            let (status, entry) = send(
                &app,
                Method::POST,
                "/api/v1/history",
                Some(json!({"targetText": target, "resultHtml": html})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert!(entry["id"].is_string());
            assert!(entry["timestamp"].is_string());
        }

        let (status, body) = send(&app, Method::GET, "/api/v1/history", None).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["targetText"], "first job");
        assert_eq!(entries[1]["resultHtml"], "<p>2</p>");
    }
}
