pub mod visit_code;

pub use visit_code::VisitCode;
