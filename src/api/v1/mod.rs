/*
 * Responsibility
 * - v1 の入口 (routes() を再公開)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
