use axum::Router;
use axum::routing::get;
use logreport_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/api/reports", get(handlers::reports::list_reports_handler))
        .route(
            "/api/reports/{report_name}",
            get(handlers::reports::run_report_handler),
        )
        .route(
            "/api/reports/{report_name}/columns",
            get(handlers::reports::report_columns_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
