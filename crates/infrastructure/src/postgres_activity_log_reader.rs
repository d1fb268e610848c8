use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{FromRow, PgPool, Postgres};
use tracing::debug;

use logreport_application::ActivityLogReader;
use logreport_core::{AppError, AppResult};
use logreport_domain::{ActivityLogEntry, ActivityLogQuery, LogAction, QueryParam};

/// PostgreSQL-backed reader for the activity logging summary.
#[derive(Clone)]
pub struct PostgresActivityLogReader {
    pool: PgPool,
}

impl PostgresActivityLogReader {
    /// Creates a reader with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ActivityLogRow {
    id: i64,
    log_user_id: Option<i64>,
    log_date: NaiveDateTime,
    log_action: String,
    activity_type_id: Option<i64>,
    subject: Option<String>,
    activity_type: Option<String>,
    sort_name: Option<String>,
    altered_by_contact_id: Option<i64>,
}

impl TryFrom<ActivityLogRow> for ActivityLogEntry {
    type Error = AppError;

    fn try_from(row: ActivityLogRow) -> Result<Self, Self::Error> {
        let log_action = row.log_action.parse::<LogAction>().map_err(|error| {
            AppError::Internal(format!(
                "activity log row {} has an unreadable action: {error}",
                row.id
            ))
        })?;

        Ok(Self {
            id: row.id,
            log_user_id: row.log_user_id,
            log_date: row.log_date,
            log_action,
            activity_type_id: row.activity_type_id,
            subject: row.subject,
            activity_type: row.activity_type,
            sort_name: row.sort_name,
            altered_by_contact_id: row.altered_by_contact_id,
        })
    }
}

fn bind_rows<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &[QueryParam],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match *param {
            QueryParam::Timestamp(value) => query.bind(value),
            QueryParam::BigInt(value) => query.bind(value),
        };
    }
    query
}

fn bind_scalar<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    params: &[QueryParam],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match *param {
            QueryParam::Timestamp(value) => query.bind(value),
            QueryParam::BigInt(value) => query.bind(value),
        };
    }
    query
}

#[async_trait]
impl ActivityLogReader for PostgresActivityLogReader {
    async fn fetch_page(&self, query: &ActivityLogQuery) -> AppResult<Vec<ActivityLogEntry>> {
        let rendered = query.to_sql();
        debug!(
            branches = query.branches().len(),
            params = rendered.params.len(),
            sort = %query.sort(),
            "fetching activity log page"
        );

        let rows = bind_rows(
            sqlx::query_as::<_, ActivityLogRow>(rendered.sql.as_str()),
            &rendered.params,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to fetch activity log page: {error}"))
        })?;

        rows.into_iter().map(ActivityLogEntry::try_from).collect()
    }

    async fn count(&self, query: &ActivityLogQuery) -> AppResult<u64> {
        let rendered = query.to_count_sql();
        debug!(
            branches = query.branches().len(),
            params = rendered.params.len(),
            "counting activity log rows"
        );

        let total = bind_scalar(
            sqlx::query_scalar::<_, i64>(rendered.sql.as_str()),
            &rendered.params,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count activity log rows: {error}"))
        })?;

        u64::try_from(total).map_err(|error| {
            AppError::Internal(format!("activity log count {total} is invalid: {error}"))
        })
    }
}
