/*
 * Responsibility
 * - handler 共通のエラー型 (AppError)
 * - IntoResponse (HTTP ステータス / JSON エラーボディ)
 * - VisitRepoError → HTTP ステータスの対応はここで決める (repo には持たせない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::VisitRepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("expired: {resource}")]
    Expired { resource: &'static str },
    #[error("corrupt cache entry")]
    CorruptEntry,
    #[error("service unavailable")]
    Unavailable,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn expired(resource: &'static str) -> Self {
        Self::Expired { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Expired { resource } => (
                StatusCode::GONE,
                "EXPIRED",
                format!("{resource} has expired."),
            ),
            AppError::CorruptEntry => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CORRUPT_ENTRY",
                "cached entry is corrupt".into(),
            ),
            AppError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "cache store unavailable".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<VisitRepoError> for AppError {
    fn from(e: VisitRepoError) -> Self {
        // The repo already logged the cause; only the status is decided here.
        match e {
            VisitRepoError::StoreUnavailable(_) => AppError::Unavailable,
            VisitRepoError::Malformed { .. } => AppError::CorruptEntry,
            VisitRepoError::Storage(_) | VisitRepoError::Encode(_) => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{cache::CacheError, visit_codec::CodecError};

    #[test]
    fn repo_errors_map_to_statuses() {
        let cases = [
            (
                VisitRepoError::StoreUnavailable(CacheError::BackendConnection("refused".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                VisitRepoError::Storage(CacheError::BackendCommand("READONLY".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                VisitRepoError::Malformed {
                    code: "abc".into(),
                    source: CodecError::MissingValidUntil,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn expired_is_gone() {
        let res = AppError::expired("visit").into_response();
        assert_eq!(res.status(), StatusCode::GONE);
    }
}
