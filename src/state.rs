//! Shared application state for all routes.

use crate::store::Repository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
}

impl AppState {
    pub fn new<R: Repository + 'static>(repo: R) -> Self {
        Self { repo: Arc::new(repo) }
    }
}
