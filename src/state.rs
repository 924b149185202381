/*
 * Responsibility
 * - Router に載せる共有状態 (AppState)
 * - 中身は Arc なので Clone は軽い
 */
use std::sync::Arc;

use crate::repos::visit_repo::VisitStore;

#[derive(Clone)]
pub struct AppState {
    pub visits: Arc<dyn VisitStore>,
}

impl AppState {
    pub fn new(visits: Arc<dyn VisitStore>) -> Self {
        Self { visits }
    }
}
