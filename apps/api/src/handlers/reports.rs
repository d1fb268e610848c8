use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Local;
use logreport_application::ActivityLogSearch;
use logreport_core::AppError;
use logreport_domain::ACTIVITY_LOGGING_SUMMARY;
use tracing::info;

use crate::dto::{
    ActivityLogSearchRequest, ActivityLoggingSummaryResponse, ReportColumnResponse,
    ReportResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_reports_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ReportResponse>>> {
    let reports = state
        .activity_logging_service
        .reports()?
        .into_iter()
        .map(ReportResponse::from)
        .collect();

    Ok(Json(reports))
}

pub async fn report_columns_handler(
    State(state): State<AppState>,
    Path(report_name): Path<String>,
) -> ApiResult<Json<Vec<ReportColumnResponse>>> {
    ensure_known_report(report_name.as_str())?;

    let columns = state
        .activity_logging_service
        .columns()
        .iter()
        .copied()
        .map(ReportColumnResponse::from)
        .collect();

    Ok(Json(columns))
}

pub async fn run_report_handler(
    State(state): State<AppState>,
    Path(report_name): Path<String>,
    Query(query): Query<ActivityLogSearchRequest>,
) -> ApiResult<Json<ActivityLoggingSummaryResponse>> {
    ensure_known_report(report_name.as_str())?;

    let page = state
        .activity_logging_service
        .search(ActivityLogSearch {
            start_date: query.start_date,
            end_date: query.end_date,
            sort: query.sort,
            offset: query.offset,
            limit: query.limit,
            today: Local::now().date_naive(),
        })
        .await?;

    info!(
        report = ACTIVITY_LOGGING_SUMMARY,
        total = page.total,
        rows = page.entries.len(),
        "report executed"
    );

    Ok(Json(ActivityLoggingSummaryResponse::from(page)))
}

fn ensure_known_report(report_name: &str) -> Result<(), AppError> {
    if report_name == ACTIVITY_LOGGING_SUMMARY {
        return Ok(());
    }

    Err(AppError::NotFound(format!("report '{report_name}' does not exist")))
}

#[cfg(test)]
mod tests;
