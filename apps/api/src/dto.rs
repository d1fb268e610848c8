use logreport_application::ActivityLogPage;
use logreport_domain::{ActivityLogEntry, ReportColumn, ReportDescriptor};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// API representation of a registered report.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/report-response.ts"
)]
pub struct ReportResponse {
    pub name: String,
    pub label: String,
    pub description: String,
}

impl From<ReportDescriptor> for ReportResponse {
    fn from(value: ReportDescriptor) -> Self {
        Self {
            name: value.name().as_str().to_owned(),
            label: value.label().as_str().to_owned(),
            description: value.description().as_str().to_owned(),
        }
    }
}

/// API representation of one report column.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/report-column-response.ts"
)]
pub struct ReportColumnResponse {
    pub header: String,
    pub field: String,
}

impl From<ReportColumn> for ReportColumnResponse {
    fn from(value: ReportColumn) -> Self {
        Self {
            header: value.header().to_owned(),
            field: value.field().to_owned(),
        }
    }
}

/// Query string of an activity logging summary search.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/activity-log-search-request.ts"
)]
pub struct ActivityLogSearchRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort: Option<String>,
    #[ts(type = "number | null")]
    pub offset: Option<u64>,
    #[ts(type = "number | null")]
    pub limit: Option<u64>,
}

/// API representation of one activity log row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/activity-log-entry-response.ts"
)]
pub struct ActivityLogEntryResponse {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number | null")]
    pub log_user_id: Option<i64>,
    pub log_date: String,
    pub log_action: String,
    #[ts(type = "number | null")]
    pub activity_type_id: Option<i64>,
    pub subject: Option<String>,
    pub activity_type: Option<String>,
    pub sort_name: Option<String>,
    #[ts(type = "number | null")]
    pub altered_by_contact_id: Option<i64>,
}

impl From<ActivityLogEntry> for ActivityLogEntryResponse {
    fn from(value: ActivityLogEntry) -> Self {
        Self {
            id: value.id,
            log_user_id: value.log_user_id,
            log_date: value.log_date.format(DATE_TIME_FORMAT).to_string(),
            log_action: value.log_action.as_str().to_owned(),
            activity_type_id: value.activity_type_id,
            subject: value.subject,
            activity_type: value.activity_type,
            sort_name: value.sort_name,
            altered_by_contact_id: value.altered_by_contact_id,
        }
    }
}

/// One page of the activity logging summary.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/activity-logging-summary-response.ts"
)]
pub struct ActivityLoggingSummaryResponse {
    pub columns: Vec<ReportColumnResponse>,
    pub rows: Vec<ActivityLogEntryResponse>,
    #[ts(type = "number")]
    pub total: u64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sort: String,
    #[ts(type = "number")]
    pub offset: u64,
    #[ts(type = "number")]
    pub limit: u64,
}

impl From<ActivityLogPage> for ActivityLoggingSummaryResponse {
    fn from(value: ActivityLogPage) -> Self {
        Self {
            columns: value
                .columns
                .into_iter()
                .map(ReportColumnResponse::from)
                .collect(),
            rows: value
                .entries
                .into_iter()
                .map(ActivityLogEntryResponse::from)
                .collect(),
            total: value.total,
            start_date: value
                .filter
                .start_date()
                .map(|date| date.format(DATE_FORMAT).to_string()),
            end_date: value
                .filter
                .end_date()
                .map(|date| date.format(DATE_FORMAT).to_string()),
            sort: value.sort.to_string(),
            offset: value.window.offset,
            limit: value.window.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ActivityLogEntryResponse, ActivityLogSearchRequest, ActivityLoggingSummaryResponse,
        HealthResponse, ReportColumnResponse, ReportResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn summary_payload_uses_snake_case_keys() {
        let response = ActivityLoggingSummaryResponse {
            columns: vec![ReportColumnResponse {
                header: "Altered On".to_owned(),
                field: "log_date".to_owned(),
            }],
            rows: Vec::new(),
            total: 0,
            start_date: Some("2026-03-01".to_owned()),
            end_date: None,
            sort: "log_date DESC".to_owned(),
            offset: 0,
            limit: 50,
        };

        let Ok(value) = serde_json::to_value(&response) else {
            panic!("summary should serialize");
        };
        assert_eq!(value["columns"][0]["header"], "Altered On");
        assert_eq!(value["start_date"], "2026-03-01");
        assert!(value["end_date"].is_null());
        assert_eq!(value["limit"], 50);
    }

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        ActivityLogSearchRequest::export(&config)?;
        ActivityLogEntryResponse::export(&config)?;
        ActivityLoggingSummaryResponse::export(&config)?;
        ReportColumnResponse::export(&config)?;
        ReportResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        HealthResponse::export(&config)?;

        Ok(())
    }
}
