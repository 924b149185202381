/*
 * Responsibility
 * - /visits の request/response DTO
 * - validate() で形式チェック (コードの一致、空欄)
 */
use serde::{Deserialize, Serialize};

use crate::api::v1::extractors::visit_code::check_code;
use crate::services::{visit::VisitorRecord, visit_codec::ValidUntil};

#[derive(Debug, Deserialize)]
pub struct CreateVisitRequest {
    pub hashed_code: String,
    pub visit_data: VisitorRecord,
}

impl CreateVisitRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        check_code(&self.hashed_code)?;

        // The code is both the store key and a field of the stored value.
        if self.visit_data.code != self.hashed_code {
            return Err("visit_data.hashed_code must match hashed_code");
        }
        if self.visit_data.visitor_full_name.trim().is_empty() {
            return Err("visitor_fullname is required");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CreateVisitResponse {
    pub hashed_code: String,
    pub valid_until: ValidUntil,
}

#[derive(Debug, Serialize)]
pub struct VisitResponse {
    #[serde(flatten)]
    pub visit: VisitorRecord,
    pub valid_until: ValidUntil,
    pub is_expired: bool,
}
