use crate::analysis::StatsService;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub service: StatsService,
}

impl AppState {
    pub fn new(service: StatsService) -> Self {
        Self { service }
    }
}
