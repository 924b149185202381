pub mod error;
pub mod visit_repo;
