use infra::ContentSource;
use std::sync::Arc;

/// Shared per-process state. Handlers only ever read it; every request
/// runs its own resolve → fetch → normalize → project pipeline.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<dyn ContentSource>,
}

impl AppState {
    pub fn new(content: Arc<dyn ContentSource>) -> Self {
        Self { content }
    }
}
