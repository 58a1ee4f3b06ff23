//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route("/sessions/:id/pair", get(handlers::get_pair))
        .route("/sessions/:id/confirm", post(handlers::confirm_selection))
        // Admin
        .route("/export", get(handlers::export_selections));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rest::handlers::{
        ConfirmResponse, CreateSessionResponse, PairResponse, SessionStatusResponse,
        ADMIN_PASSWORD_HEADER,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use realcheck_corpus::Corpus;
    use realcheck_engine::{EngineConfig, ExperimentEngine};
    use realcheck_store::InMemoryResponseStore;
    use realcheck_types::{Example, GenerationMetadata, Speaker, StoredSelection, Utterance};
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn script(text: &str) -> Vec<Utterance> {
        vec![
            Utterance {
                speaker: Speaker::Agent,
                text: "Guten Tag, wie kann ich helfen?".to_string(),
            },
            Utterance {
                speaker: Speaker::Other,
                text: text.to_string(),
            },
        ]
    }

    fn corpus(with_synthetic: bool) -> Corpus {
        let real = (0..4)
            .map(|i| Example::new(format!("real-{i}"), script("Meine Karte ist gesperrt.")))
            .collect();
        let synthetic = if with_synthetic {
            (0..4)
                .map(|i| {
                    Example::new(format!("syn-{i}"), script("Ich habe eine Frage."))
                        .with_metadata(GenerationMetadata {
                            model_id: "gpt-4o".to_string(),
                            instruct_lang: "de".to_string(),
                            generation_method: "persona".to_string(),
                        })
                })
                .collect()
        } else {
            Vec::new()
        };
        let curated = vec![Example::new("curated-0", script("Ich ziehe um."))];
        Corpus::new(real, synthetic, curated)
    }

    fn engine(corpus: Corpus) -> Arc<ExperimentEngine> {
        Arc::new(ExperimentEngine::new(
            Arc::new(corpus),
            Arc::new(InMemoryResponseStore::new()),
            EngineConfig::seeded(11),
        ))
    }

    fn router(engine: Arc<ExperimentEngine>, admin_password: Option<&str>) -> Router {
        create_router(AppState::new(
            engine,
            Some("PROLIFIC-42".to_string()),
            admin_password.map(str::to_string),
        ))
    }

    fn app_with(corpus: Corpus, admin_password: Option<&str>) -> Router {
        router(engine(corpus), admin_password)
    }

    fn app() -> Router {
        app_with(corpus(true), Some("s3cret"))
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn start(app: &Router) -> String {
        let response = send(app, post_json("/api/v1/sessions", serde_json::json!({}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json::<CreateSessionResponse>(response).await.user_id
    }

    #[tokio::test]
    async fn test_health() {
        let app = app();
        let response = send(&app, get("/api/v1/health")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["corpus"]["curated"], 1);
    }

    #[tokio::test]
    async fn test_full_session_over_http() {
        let app = app();
        let user = start(&app).await;

        for round in 1..=10u32 {
            let response = send(&app, get(&format!("/api/v1/sessions/{user}/pair"))).await;
            assert_eq!(response.status(), StatusCode::OK);
            let pair: PairResponse = json(response).await;
            assert_eq!(pair.round, round);
            assert_eq!(pair.left.script.len(), 2);

            let response = send(
                &app,
                post_json(
                    &format!("/api/v1/sessions/{user}/confirm"),
                    serde_json::json!({ "choice": "left" }),
                ),
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK);
            let confirmed: ConfirmResponse = json(response).await;
            assert!(confirmed.recorded);
            assert_eq!(confirmed.round_count, round);
            assert_eq!(confirmed.completed, round == 10);
            assert_eq!(
                confirmed.completion_code.is_some(),
                round == 10,
                "code only once completed"
            );
        }

        let response = send(&app, get(&format!("/api/v1/sessions/{user}/pair"))).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{user}/confirm"),
                serde_json::json!({ "choice": "right" }),
            ),
        )
        .await;
        let confirmed: ConfirmResponse = json(response).await;
        assert!(!confirmed.recorded);
        assert_eq!(confirmed.round_count, 10);

        let response = send(&app, get(&format!("/api/v1/sessions/{user}"))).await;
        let status: SessionStatusResponse = json(response).await;
        assert!(status.completed);
        assert_eq!(status.completion_code.as_deref(), Some("PROLIFIC-42"));
    }

    #[tokio::test]
    async fn test_confirm_without_choice_is_unprocessable() {
        let app = app();
        let user = start(&app).await;
        send(&app, get(&format!("/api/v1/sessions/{user}/pair"))).await;

        let response = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{user}/confirm"),
                serde_json::json!({ "choice": null }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = json(response).await;
        assert_eq!(body["code"], "NO_SELECTION");

        let response = send(&app, get(&format!("/api/v1/sessions/{user}"))).await;
        let status: SessionStatusResponse = json(response).await;
        assert_eq!(status.round_count, 0);
        assert!(status.completion_code.is_none());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app();
        let response = send(&app, get("/api/v1/sessions/nobody")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/v1/sessions/nobody")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, request).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_pair_for_unstarted_session_creates_nothing() {
        let engine = engine(corpus(true));
        let app = router(Arc::clone(&engine), None);
        let user = start(&app).await;

        for i in 0..200 {
            let response = send(&app, get(&format!("/api/v1/sessions/junk-{i}/pair"))).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
        assert_eq!(engine.sessions().len().await, 1);

        let response = send(&app, get(&format!("/api/v1/sessions/{user}/pair"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json::<PairResponse>(response).await.round, 1);
    }

    #[tokio::test]
    async fn test_empty_synthetic_pool_is_unavailable() {
        let app = app_with(corpus(false), None);
        let user = start(&app).await;
        let response = send(&app, get(&format!("/api/v1/sessions/{user}/pair"))).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: serde_json::Value = json(response).await;
        assert_eq!(body["code"], "EMPTY_CORPUS");
    }

    #[tokio::test]
    async fn test_export_requires_password() {
        let app = app();
        let user = start(&app).await;
        send(&app, get(&format!("/api/v1/sessions/{user}/pair"))).await;
        send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{user}/confirm"),
                serde_json::json!({ "choice": "right" }),
            ),
        )
        .await;

        let response = send(&app, get("/api/v1/export")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/export")
            .header(ADMIN_PASSWORD_HEADER, "wrong")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, request).await.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/export")
            .header(ADMIN_PASSWORD_HEADER, "s3cret")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let rows: Vec<StoredSelection> = json(response).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.user_id.as_str(), user);
        assert_eq!(rows[0].record.model_id, "gpt-4o");
    }

    #[tokio::test]
    async fn test_export_disabled_without_password() {
        let app = app_with(corpus(true), None);
        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/export")
            .header(ADMIN_PASSWORD_HEADER, "anything")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, request).await.status(), StatusCode::FORBIDDEN);
    }
}
