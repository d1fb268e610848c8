use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use logreport_application::{CustomDataSchema, CustomLogTable};
use logreport_core::{AppError, AppResult};
use logreport_domain::SqlIdentifier;

/// Default name of the custom group configuration table.
pub const DEFAULT_CUSTOM_GROUP_TABLE: &str = "civicrm_custom_group";

/// Prefix the logging subsystem puts in front of a logged table's name.
pub const LOG_TABLE_PREFIX: &str = "log_";

/// PostgreSQL-backed reader for custom-field configuration.
///
/// A custom group counts as logged when a table named `log_<table_name>` exists in the current
/// schema.
#[derive(Clone)]
pub struct PostgresCustomDataSchema {
    pool: PgPool,
    custom_group_table: SqlIdentifier,
}

impl PostgresCustomDataSchema {
    /// Creates a reader over the provided pool and custom group table.
    #[must_use]
    pub fn new(pool: PgPool, custom_group_table: SqlIdentifier) -> Self {
        Self {
            pool,
            custom_group_table,
        }
    }
}

#[derive(Debug, FromRow)]
struct CustomLogTableRow {
    table_name: String,
    log_table_name: String,
}

#[async_trait]
impl CustomDataSchema for PostgresCustomDataSchema {
    async fn log_tables_for_entity(&self, entity: &str) -> AppResult<Vec<CustomLogTable>> {
        let sql = format!(
            r#"
            SELECT
                cg.table_name,
                '{LOG_TABLE_PREFIX}' || cg.table_name AS log_table_name
            FROM {custom_group_table} cg
            WHERE cg.extends = $1
                AND EXISTS (
                    SELECT 1
                    FROM information_schema.tables t
                    WHERE t.table_schema = current_schema()
                        AND t.table_name = '{LOG_TABLE_PREFIX}' || cg.table_name
                )
            ORDER BY cg.id
            "#,
            custom_group_table = self.custom_group_table,
        );

        let rows = sqlx::query_as::<_, CustomLogTableRow>(sql.as_str())
            .bind(entity)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list custom log tables for entity '{entity}': {error}"
                ))
            })?;

        debug!(entity, tables = rows.len(), "discovered custom log tables");

        Ok(rows
            .into_iter()
            .map(|row| CustomLogTable {
                table_name: row.table_name,
                log_table_name: row.log_table_name,
            })
            .collect())
    }

    async fn custom_group_title(&self, table_name: &str) -> AppResult<Option<String>> {
        let sql = format!(
            r#"
            SELECT title
            FROM {custom_group_table}
            WHERE table_name = $1
            ORDER BY id
            LIMIT 1
            "#,
            custom_group_table = self.custom_group_table,
        );

        let title = sqlx::query_scalar::<_, Option<String>>(sql.as_str())
            .bind(table_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to find custom group title for table '{table_name}': {error}"
                ))
            })?;

        Ok(title.flatten())
    }
}
