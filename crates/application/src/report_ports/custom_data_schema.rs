use async_trait::async_trait;
use logreport_core::AppResult;

/// Custom-field table of an entity paired with the table that logs its changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomLogTable {
    /// Physical custom-field table.
    pub table_name: String,
    /// Audit table recording changes to `table_name`.
    pub log_table_name: String,
}

/// Port for reading custom-field configuration and logging schema metadata.
#[async_trait]
pub trait CustomDataSchema: Send + Sync {
    /// Lists logged custom-field tables extending `entity`, in discovery order.
    async fn log_tables_for_entity(&self, entity: &str) -> AppResult<Vec<CustomLogTable>>;

    /// Returns the title of the custom group stored in `table_name`, if any.
    async fn custom_group_title(&self, table_name: &str) -> AppResult<Option<String>>;
}
