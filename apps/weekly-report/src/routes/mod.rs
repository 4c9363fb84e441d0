pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assist::handlers as assist;
use crate::report::handlers as report;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(report::handle_index))
        .route("/health", get(health::health_handler))
        .route("/api/defaults", get(report::handle_defaults))
        .route("/generate", post(report::handle_generate))
        // AI Assist
        .route("/api/suggest", post(assist::handle_suggest))
        .route("/api/improve", post(assist::handle_improve))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::docx::scaffold::write_default_template;
    use crate::docx::Document;
    use crate::render::DOCX_MIME;
    use crate::report::store::load_record;

    fn state_in(dir: &Path, persist_yaml: bool) -> AppState {
        AppState::new(Config {
            template_path: dir.join("template.docx"),
            input_file: dir.join("input.yaml"),
            persist_yaml,
            ..Config::default()
        })
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(state_in(dir.path(), false))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(state_in(dir.path(), false))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("action=\"/generate\""));
    }

    #[tokio::test]
    async fn test_defaults_fill_week_and_file_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("input.yaml"), "name: Dana\nrole: QA\n").unwrap();

        let response = build_router(state_in(dir.path(), true))
            .oneshot(Request::get("/api/defaults").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["name"], "Dana");
        assert_eq!(body["name_for_file"], "Dana");
        assert!(body["week"].as_str().unwrap().contains(" → "));
    }

    #[tokio::test]
    async fn test_generate_requires_name_role_week() {
        let dir = tempfile::tempdir().unwrap();
        write_default_template(&dir.path().join("template.docx")).unwrap();

        let response = build_router(state_in(dir.path(), false))
            .oneshot(form_request("name=Dana&role=&week="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Role, Week required");
    }

    #[tokio::test]
    async fn test_generate_missing_template_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(state_in(dir.path(), false))
            .oneshot(form_request("name=Dana&role=QA&week=W1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "TEMPLATE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_generate_downloads_docx_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        write_default_template(&dir.path().join("template.docx")).unwrap();

        let body = "name=Dana+Smith&role=QA&name_for_file=D%2FSmith&week=2026-10-12+%E2%86%92+2026-10-16\
            &weekly_objective=Ship+it\
            &execution_summary%5B%5D=Importer&execution_content%5B%5D=Done.+-+parse\
            &next_week_focus%5B%5D=Rollout";
        let response = build_router(state_in(dir.path(), true))
            .oneshot(form_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], DOCX_MIME);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains("filename=\"[CAP Weekly Report] DSmith.docx\""));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc = Document::from_bytes(&bytes).unwrap();
        let texts = doc.paragraph_texts();
        assert!(texts.contains(&"Ship it"));
        assert!(texts.iter().any(|t| t.contains("parse")));

        let saved = load_record(&dir.path().join("input.yaml")).unwrap();
        assert_eq!(saved.name, "Dana Smith");
        assert_eq!(saved.execution_output[0].content, "Done.\n- parse");
    }

    #[tokio::test]
    async fn test_suggest_requires_notes() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(state_in(dir.path(), false))
            .oneshot(json_request("/api/suggest", r#"{"notes": "  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_improve_without_key_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let response = build_router(state_in(dir.path(), false))
            .oneshot(json_request("/api/improve", r#"{"text": "did things"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "AI_UNAVAILABLE");
    }
}
