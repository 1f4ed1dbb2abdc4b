pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{forecast, jobs, mentor, sentiment, skills};

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Skill analysis
        .route("/parse-resume", post(skills::handlers::handle_parse_resume))
        .route("/extract-skills", post(skills::handlers::handle_extract_skills))
        .route("/predict-trend", post(skills::handlers::handle_predict_trend))
        .route("/semantic-skills", post(skills::handlers::handle_semantic_skills))
        // Market data
        .route("/jobs", get(jobs::handlers::handle_jobs))
        .route("/forecast", post(forecast::handlers::handle_forecast))
        // Text utilities
        .route(
            "/analyze-sentiment",
            post(sentiment::handlers::handle_analyze_sentiment),
        )
        .route("/chat", post(mentor::handlers::handle_chat))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::tests::make_test_pdf;
    use crate::jobs::JobSearchClient;
    use crate::llm_client::testing::{live_gate, FailingGenerator, ScriptedGenerator};
    use crate::llm_client::AvailabilityGate;
    use crate::skills::SkillTaxonomy;

    const BOUNDARY: &str = "engine-test-boundary";

    fn test_config() -> Config {
        Config {
            anthropic_api_key: None,
            llm_model: "test-model".to_string(),
            llm_timeout_secs: 5,
            serpapi_api_key: None,
            skill_taxonomy_path: None,
            max_upload_bytes: 64 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn test_state(gate: AvailabilityGate) -> AppState {
        AppState {
            gate,
            taxonomy: Arc::new(SkillTaxonomy::default()),
            jobs: JobSearchClient::new(None).unwrap(),
            config: test_config(),
        }
    }

    fn offline_app() -> Router {
        build_router(test_state(AvailabilityGate::Unconfigured))
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_request(field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/parse-resume")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn skills_of(body: &Value, key: &str) -> Vec<String> {
        body[key]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn health_reports_offline_llm() {
        let response = offline_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["nlp_pipeline_loaded"], true);
        assert_eq!(body["llm_active"], false);
        assert_eq!(body["llm_configured"], false);
        assert_eq!(body["llm_status"], "unconfigured");
        assert_eq!(body["jobs_configured"], false);
        assert!(body["taxonomy_size"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn health_reports_live_llm() {
        let app = build_router(test_state(live_gate(ScriptedGenerator::new("{}"))));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["llm_active"], true);
        assert_eq!(body["llm_status"], "live");
    }

    #[tokio::test]
    async fn parse_resume_pdf_uses_taxonomy_when_offline() {
        let pdf = make_test_pdf(&["Experienced with Python, React and AWS"]);
        let response = offline_app()
            .oneshot(multipart_request("file", "resume.pdf", &pdf))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["source"], "taxonomy");
        assert_eq!(body["role"], "Professional");
        assert_eq!(body["seniority"], "Unknown");
        let technical = skills_of(&body, "technical_skills");
        for skill in ["Python", "React", "Aws"] {
            assert!(technical.contains(&skill.to_string()), "missing {skill}");
        }
    }

    #[tokio::test]
    async fn parse_resume_uses_llm_when_live() {
        let generator = ScriptedGenerator::new(
            r#"{"technical_skills": ["Rust"], "soft_skills": ["Mentoring"], "role": "Backend Engineer", "seniority": "Senior"}"#,
        );
        let app = build_router(test_state(live_gate(generator)));
        let response = app
            .oneshot(multipart_request(
                "file",
                "resume.txt",
                b"Senior backend engineer writing Rust",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["source"], "llm");
        assert_eq!(body["role"], "Backend Engineer");
        assert!(body.get("warning").is_none());
    }

    #[tokio::test]
    async fn parse_resume_falls_back_on_llm_failure() {
        let app = build_router(test_state(live_gate(Arc::new(FailingGenerator))));
        let response = app
            .oneshot(multipart_request("file", "resume.txt", b"Docker and Kubernetes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["source"], "taxonomy");
        assert!(body["warning"].is_string());
        assert!(skills_of(&body, "technical_skills").contains(&"Docker".to_string()));
    }

    #[tokio::test]
    async fn parse_resume_without_file_field_is_400() {
        let response = offline_app()
            .oneshot(multipart_request("attachment", "resume.txt", b"Python"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn parse_resume_non_multipart_uses_error_envelope() {
        let response = offline_app()
            .oneshot(json_request("/parse-resume", json!({"file": "resume.pdf"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn parse_resume_pdf_without_extension() {
        let pdf = make_test_pdf(&["Experienced with Python and Docker"]);
        let response = offline_app()
            .oneshot(multipart_request("file", "resume", &pdf))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let technical = skills_of(&body, "technical_skills");
        assert!(technical.contains(&"Python".to_string()), "got {technical:?}");
    }

    #[tokio::test]
    async fn parse_resume_over_limit_is_413() {
        let oversized = vec![b'a'; 128 * 1024];
        let response = offline_app()
            .oneshot(multipart_request("file", "resume.txt", &oversized))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn extract_skills_from_text() {
        let response = offline_app()
            .oneshot(json_request(
                "/extract-skills",
                json!({"text": "Experienced with Python, React and AWS"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let technical = skills_of(&body, "technical_skills");
        for skill in ["Aws", "Python", "React"] {
            assert!(technical.contains(&skill.to_string()), "missing {skill}");
        }
        assert_eq!(body["source"], "taxonomy");
    }

    #[tokio::test]
    async fn missing_fields_are_400() {
        let cases = [
            ("/extract-skills", json!({})),
            ("/predict-trend", json!({"skill": "  "})),
            ("/semantic-skills", json!({})),
            ("/forecast", json!({"horizon": 2})),
            ("/chat", json!({"history": []})),
            ("/analyze-sentiment", json!({"text": ""})),
        ];
        for (uri, payload) in cases {
            let response = offline_app()
                .oneshot(json_request(uri, payload))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body = read_json(response).await;
            assert!(body["error"]["message"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/predict-trend")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = offline_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn predict_trend_offline_fallback() {
        let response = offline_app()
            .oneshot(json_request("/predict-trend", json!({"skill": "Rust"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["skill"], "Rust");
        assert_eq!(body["trend"], "Growing");
        assert_eq!(body["score"], 85);
        assert!(body["warning"].is_string());
    }

    #[tokio::test]
    async fn semantic_skills_offline_lookup() {
        let response = offline_app()
            .oneshot(json_request("/semantic-skills", json!({"skill": "Python"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert!(skills_of(&body, "related_skills").contains(&"Django".to_string()));
    }

    #[tokio::test]
    async fn forecast_projects_horizon() {
        let response = offline_app()
            .oneshot(json_request(
                "/forecast",
                json!({
                    "skill": "Rust",
                    "history": [
                        {"year": 2020, "demand_score": 40.0},
                        {"year": 2021, "demand_score": 48.0},
                        {"year": 2022, "demand_score": 55.0},
                        {"year": 2023, "demand_score": 61.0}
                    ],
                    "horizon": 2
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["skill"], "Rust");
        let points = body["forecast"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["year"], 2024);
        assert_eq!(points[1]["year"], 2025);
    }

    #[tokio::test]
    async fn forecast_short_history_is_400() {
        let response = offline_app()
            .oneshot(json_request("/forecast", json!({"history": [10.0]})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "INSUFFICIENT_DATA");
    }

    #[tokio::test]
    async fn sentiment_endpoint() {
        let response = offline_app()
            .oneshot(json_request("/analyze-sentiment", json!({"text": "I love this"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["sentiment"], "Positive");
    }

    #[tokio::test]
    async fn chat_offline_returns_canned_reply() {
        let response = offline_app()
            .oneshot(json_request("/chat", json!({"message": "What should I learn?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert!(body["response"].as_str().unwrap().contains("offline"));
        assert!(body["warning"].is_string());
    }

    #[tokio::test]
    async fn chat_live_reply() {
        let app = build_router(test_state(live_gate(ScriptedGenerator::new("Learn Rust."))));
        let response = app
            .oneshot(json_request(
                "/chat",
                json!({
                    "message": "What next?",
                    "history": [{"role": "user", "content": "Hi"}, {"role": "bot", "content": "Hello"}]
                }),
            ))
            .await
            .unwrap();
        let body = read_json(response).await;
        assert_eq!(body["response"], "Learn Rust.");
        assert!(body.get("warning").is_none());
    }

    #[tokio::test]
    async fn jobs_without_skill_is_400() {
        let response = offline_app()
            .oneshot(Request::get("/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn jobs_without_key_is_503() {
        let response = offline_app()
            .oneshot(
                Request::get("/jobs?skill=rust&location=Berlin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = read_json(response).await;
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
    }
}
