/*
 * Responsibility
 * - v1 の URL 構成
 * - /health, /visits, /visits/{code}
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    visits::{create_visit, get_visit},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/visits", post(create_visit))
        .route("/visits/{code}", get(get_visit))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::services::cache::memory::MemoryConnector;
    use crate::state::testing::memory_state;

    fn app() -> (Router, MemoryConnector) {
        let (state, connector) = memory_state();
        (routes().with_state(state), connector)
    }

    fn create_body(code: &str) -> Value {
        json!({
            "hashed_code": code,
            "visit_data": {
                "user_id": "11111111-1111-1111-1111-111111111111",
                "estate_id": "22222222-2222-2222-2222-222222222222",
                "visitor_fullname": "Jane Doe",
                "relationship_with_resident": "family",
                "hashed_code": code
            }
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn get_uri(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_to_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = app();

        let response = get_uri(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_to_json(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn create_then_get_visit() {
        let (app, _) = app();

        let response = post_json(app.clone(), "/visits", create_body("abc123")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_to_json(response).await;
        assert_eq!(created["hashed_code"], "abc123");
        let valid_until = created["valid_until"].as_str().unwrap().to_string();
        assert!(valid_until.ends_with("+0000"));

        let response = get_uri(app, "/visits/abc123").await;
        assert_eq!(response.status(), StatusCode::OK);
        let visit = body_to_json(response).await;
        assert_eq!(visit["hashed_code"], "abc123");
        assert_eq!(visit["user_id"], "11111111-1111-1111-1111-111111111111");
        assert_eq!(visit["estate_id"], "22222222-2222-2222-2222-222222222222");
        assert_eq!(visit["visitor_fullname"], "Jane Doe");
        assert_eq!(visit["relationship_with_resident"], "family");
        assert_eq!(visit["valid_until"], valid_until.as_str());
        assert_eq!(visit["is_expired"], false);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (app, _) = app();

        let response = get_uri(app, "/visits/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_to_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn expired_entry_is_gone() {
        let (app, connector) = app();
        let mut stale = create_body("old")["visit_data"].clone();
        stale["valid_until"] = json!("2020-01-01 00:00:00.000+0000");
        connector.raw_set("old", &stale.to_string());

        let response = get_uri(app, "/visits/old").await;
        assert_eq!(response.status(), StatusCode::GONE);
        let body = body_to_json(response).await;
        assert_eq!(body["error"]["code"], "EXPIRED");
    }

    #[tokio::test]
    async fn corrupt_entry_is_internal_error() {
        let (app, connector) = app();
        let no_expiry = create_body("bad")["visit_data"].clone();
        connector.raw_set("bad", &no_expiry.to_string());

        let response = get_uri(app, "/visits/bad").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_to_json(response).await;
        assert_eq!(body["error"]["code"], "CORRUPT_ENTRY");
    }

    #[tokio::test]
    async fn unreachable_store_is_unavailable() {
        let (app, connector) = app();
        connector.refuse_connections(true);

        let response = post_json(app.clone(), "/visits", create_body("abc123")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = get_uri(app, "/visits/abc123").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn failing_store_is_internal_error() {
        let (app, connector) = app();
        connector.fail_commands(true);

        let response = post_json(app, "/visits", create_body("abc123")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_to_json(response).await;
        assert_eq!(body["error"]["code"], "INTERNAL_SERVER_ERROR");
    }

    #[tokio::test]
    async fn mismatched_codes_are_rejected() {
        let (app, connector) = app();
        let mut body = create_body("abc123");
        body["visit_data"]["hashed_code"] = json!("other");

        let response = post_json(app, "/visits", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_VISIT");
        assert_eq!(connector.raw_get("abc123"), None);
    }

    #[tokio::test]
    async fn unknown_relationship_is_rejected() {
        let (app, _) = app();
        let mut body = create_body("abc123");
        body["visit_data"]["relationship_with_resident"] = json!("stranger");

        let response = post_json(app, "/visits", body).await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn oversized_path_code_is_rejected() {
        let (app, _) = app();
        let uri = format!("/visits/{}", "a".repeat(300));

        let response = get_uri(app, &uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_CODE");
    }
}
