/*
 * Responsibility
 * - Path からアクセスコードを取り出す (/visits/{code})
 * - 空 / 長すぎるコードはストアに触れる前に 400 で弾く
 */
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

/// Upper bound on access code length, in bytes.
pub const MAX_CODE_LEN: usize = 256;

pub fn check_code(code: &str) -> Result<(), &'static str> {
    if code.trim().is_empty() {
        return Err("hashed_code is required");
    }
    if code.len() > MAX_CODE_LEN {
        return Err("hashed_code must be <= 256 bytes");
    }
    Ok(())
}

/// Access code taken from the request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitCode(pub String);

impl<S> FromRequestParts<S> for VisitCode
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(code) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request("INVALID_CODE", "invalid code"))?;

        check_code(&code).map_err(|msg| AppError::bad_request("INVALID_CODE", msg))?;

        Ok(Self(code))
    }
}
