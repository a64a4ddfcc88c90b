use csm_speech::SpeechService;

/// Shared application state: the speech pipeline behind every route.
pub struct AppState {
    pub service: SpeechService,
}

impl AppState {
    /// State over a fresh pipeline; the generator resolves at warm-up or on
    /// the first request.
    pub fn new() -> Self {
        Self {
            service: SpeechService::new(),
        }
    }

    /// State over a specific pipeline (test doubles, shared registries).
    pub fn with_service(service: SpeechService) -> Self {
        Self { service }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
