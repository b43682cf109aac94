use std::sync::Arc;

use crate::engine::ProgressEngine;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<ProgressEngine>,
}

impl AppState {
    pub fn new(engine: Arc<ProgressEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ProgressEngine {
        &self.engine
    }
}
