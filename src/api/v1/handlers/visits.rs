/*
 * Responsibility
 * - POST /visits, GET /visits/{code}
 * - Json → DTO validation → VisitStore
 * - FetchOutcome (Found / NotFound / Expired) を HTTP に変換
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::visits::{CreateVisitRequest, CreateVisitResponse, VisitResponse},
        extractors::VisitCode,
    },
    error::AppError,
    repos::visit_repo::FetchOutcome,
    state::AppState,
};

pub async fn create_visit(
    State(state): State<AppState>,
    Json(req): Json<CreateVisitRequest>,
) -> Result<(StatusCode, Json<CreateVisitResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_VISIT", msg))?;

    let stored = state.visits.store(&req.visit_data).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateVisitResponse {
            hashed_code: stored.code,
            valid_until: stored.valid_until,
        }),
    ))
}

pub async fn get_visit(
    State(state): State<AppState>,
    VisitCode(code): VisitCode,
) -> Result<Json<VisitResponse>, AppError> {
    match state.visits.fetch(&code).await? {
        FetchOutcome::Found {
            record,
            valid_until,
        } => Ok(Json(VisitResponse {
            visit: record,
            valid_until,
            is_expired: false,
        })),
        FetchOutcome::NotFound => Err(AppError::not_found("visit")),
        FetchOutcome::Expired { .. } => Err(AppError::expired("visit")),
    }
}
