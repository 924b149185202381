/*
 * Responsibility
 * - GET /healthz, GET /api/v1/health
 * - プロセスの生存確認のみ。キャッシュストアへの疎通はここでは見ない
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
