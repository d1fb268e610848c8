//! Activity logging summary API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use logreport_application::ActivityLoggingService;
use logreport_core::AppError;
use logreport_infrastructure::{PostgresActivityLogReader, PostgresCustomDataSchema};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    let custom_data_schema = Arc::new(PostgresCustomDataSchema::new(
        pool.clone(),
        config.custom_group_table.clone(),
    ));
    let activity_log_reader = Arc::new(PostgresActivityLogReader::new(pool));

    let app_state = AppState {
        activity_logging_service: ActivityLoggingService::new(
            config.report_schema.clone(),
            custom_data_schema,
            activity_log_reader,
            config.page_size,
        ),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(
        %address,
        primary_log_table = %config.report_schema.primary_log_table(),
        "activity logging summary api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
