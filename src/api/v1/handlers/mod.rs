pub mod health;
pub mod visits;
