use std::sync::Arc;

use favvid_core::Repository;

#[derive(Clone)]
pub struct AppState {
    repository: Arc<dyn Repository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &dyn Repository {
        self.repository.as_ref()
    }
}
