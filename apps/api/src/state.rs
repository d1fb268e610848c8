use logreport_application::ActivityLoggingService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub activity_logging_service: ActivityLoggingService,
}
