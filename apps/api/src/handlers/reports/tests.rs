use std::sync::Arc;

use async_trait::async_trait;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use logreport_application::{
    ACTIVITY_ENTITY, ActivityLogReader, ActivityLoggingService, PageSizePolicy,
};
use logreport_core::AppResult;
use logreport_domain::{ActivityLogEntry, ActivityLogQuery, LogAction, ReportSchema};
use logreport_infrastructure::InMemoryCustomDataSchema;
use tokio::sync::Mutex;

use super::{list_reports_handler, report_columns_handler, run_report_handler};
use crate::dto::ActivityLogSearchRequest;
use crate::state::AppState;

#[derive(Default)]
struct RecordingReader {
    entries: Vec<ActivityLogEntry>,
    statements: Mutex<Vec<String>>,
}

#[async_trait]
impl ActivityLogReader for RecordingReader {
    async fn fetch_page(&self, query: &ActivityLogQuery) -> AppResult<Vec<ActivityLogEntry>> {
        self.statements.lock().await.push(query.to_sql().sql);
        Ok(self.entries.clone())
    }

    async fn count(&self, query: &ActivityLogQuery) -> AppResult<u64> {
        self.statements.lock().await.push(query.to_count_sql().sql);
        Ok(self.entries.len() as u64)
    }
}

fn deleted_call_entry() -> ActivityLogEntry {
    let Some(log_date) =
        NaiveDate::from_ymd_opt(2026, 3, 4).and_then(|date| date.and_hms_opt(11, 0, 0))
    else {
        panic!("fixture date should be valid");
    };

    ActivityLogEntry {
        id: 101,
        log_user_id: Some(10),
        log_date,
        log_action: LogAction::Delete,
        activity_type_id: Some(2),
        subject: Some("Call back".to_owned()),
        activity_type: Some("Phone Call".to_owned()),
        sort_name: Some("Doe, Jane".to_owned()),
        altered_by_contact_id: Some(10),
    }
}

async fn test_state(reader: Arc<RecordingReader>) -> AppState {
    let catalog = InMemoryCustomDataSchema::new();
    catalog
        .register(ACTIVITY_ENTITY, "civicrm_value_meeting_notes", Some("Meeting Notes"))
        .await;

    let Ok(schema) = ReportSchema::civicrm() else {
        panic!("default schema should be valid");
    };

    AppState {
        activity_logging_service: ActivityLoggingService::new(
            schema,
            Arc::new(catalog),
            reader,
            PageSizePolicy::default(),
        ),
    }
}

#[tokio::test]
async fn lists_the_registered_report() {
    let state = test_state(Arc::new(RecordingReader::default())).await;

    let Ok(Json(reports)) = list_reports_handler(State(state)).await else {
        panic!("listing reports should succeed");
    };

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].name, "activity_logging_summary");
    assert_eq!(reports[0].label, "Activity Logging Summary");
}

#[tokio::test]
async fn returns_columns_in_display_order() {
    let state = test_state(Arc::new(RecordingReader::default())).await;

    let result =
        report_columns_handler(State(state), Path("activity_logging_summary".to_owned())).await;
    let Ok(Json(columns)) = result else {
        panic!("columns should be listed");
    };

    let headers: Vec<&str> = columns.iter().map(|column| column.header.as_str()).collect();
    assert_eq!(
        headers,
        vec![
            "Altered On",
            "Action",
            "Type",
            "Subject",
            "Altered By",
            "ID",
            "Altered By ID"
        ]
    );
    assert_eq!(columns[6].field, "altered_by_contact_id");
}

#[tokio::test]
async fn unknown_report_is_not_found() {
    let state = test_state(Arc::new(RecordingReader::default())).await;

    let result = run_report_handler(
        State(state),
        Path("contact_logging_summary".to_owned()),
        Query(ActivityLogSearchRequest::default()),
    )
    .await;
    let Err(error) = result else {
        panic!("unknown report should fail");
    };

    assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn runs_report_with_default_window_and_custom_sources() {
    let reader = Arc::new(RecordingReader {
        entries: vec![deleted_call_entry()],
        ..RecordingReader::default()
    });
    let state = test_state(reader.clone()).await;

    let result = run_report_handler(
        State(state),
        Path("activity_logging_summary".to_owned()),
        Query(ActivityLogSearchRequest::default()),
    )
    .await;
    let Ok(Json(response)) = result else {
        panic!("report should run");
    };

    assert_eq!(response.total, 1);
    assert_eq!(response.limit, 50);
    assert_eq!(response.offset, 0);
    assert_eq!(response.sort, "log_date DESC");
    assert_eq!(response.columns.len(), 7);
    assert!(response.start_date.is_some());
    assert!(response.end_date.is_some());

    let row = &response.rows[0];
    assert_eq!(row.log_date, "2026-03-04 11:00:00");
    assert_eq!(row.log_action, "Delete");
    assert_eq!(row.activity_type.as_deref(), Some("Phone Call"));

    let statements = reader.statements.lock().await;
    assert_eq!(statements.len(), 2);
    assert!(statements[1].contains("'Meeting Notes [custom]' AS subject"));
    assert!(statements[1].contains("log_civicrm_value_meeting_notes"));
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
    let reader = Arc::new(RecordingReader::default());
    let state = test_state(reader.clone()).await;

    let result = run_report_handler(
        State(state),
        Path("activity_logging_summary".to_owned()),
        Query(ActivityLogSearchRequest {
            start_date: Some("03/01/2026".to_owned()),
            ..ActivityLogSearchRequest::default()
        }),
    )
    .await;
    let Err(error) = result else {
        panic!("malformed date should fail");
    };

    assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    assert!(reader.statements.lock().await.is_empty());
}
