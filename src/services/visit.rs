//! Visitor access record: what a resident registers for a guest, keyed by the
//! access code the caller generated.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Relation between the visitor and the visited resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Family,
    Partner,
    Friend,
    Technician,
    Taxi,
    Delivery,
}

/// A visitor record as it travels over HTTP and into the store.
///
/// Wire names are kept stable: existing entries in the store and existing
/// clients use `visitor_fullname`, `relationship_with_resident` and
/// `hashed_code`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorRecord {
    pub user_id: Uuid,
    pub estate_id: Uuid,
    #[serde(rename = "visitor_fullname")]
    pub visitor_full_name: String,
    #[serde(rename = "relationship_with_resident")]
    pub relationship: Relationship,
    /// Store key for this record.
    #[serde(rename = "hashed_code")]
    pub code: String,
}
