use async_trait::async_trait;
use tokio::sync::RwLock;

use logreport_application::{CustomDataSchema, CustomLogTable};
use logreport_core::AppResult;

#[derive(Debug, Clone)]
struct RegisteredGroup {
    entity: String,
    table: CustomLogTable,
    title: Option<String>,
}

/// In-memory custom-field catalog, listing groups in registration order.
#[derive(Debug, Default)]
pub struct InMemoryCustomDataSchema {
    groups: RwLock<Vec<RegisteredGroup>>,
}

impl InMemoryCustomDataSchema {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a logged custom group extending `entity`.
    pub async fn register(
        &self,
        entity: impl Into<String>,
        table_name: impl Into<String>,
        title: Option<&str>,
    ) {
        let table_name = table_name.into();
        let log_table_name = format!("{}{table_name}", crate::LOG_TABLE_PREFIX);

        self.groups.write().await.push(RegisteredGroup {
            entity: entity.into(),
            table: CustomLogTable {
                table_name,
                log_table_name,
            },
            title: title.map(str::to_owned),
        });
    }
}

#[async_trait]
impl CustomDataSchema for InMemoryCustomDataSchema {
    async fn log_tables_for_entity(&self, entity: &str) -> AppResult<Vec<CustomLogTable>> {
        let groups = self.groups.read().await;
        Ok(groups
            .iter()
            .filter(|group| group.entity == entity)
            .map(|group| group.table.clone())
            .collect())
    }

    async fn custom_group_title(&self, table_name: &str) -> AppResult<Option<String>> {
        let groups = self.groups.read().await;
        Ok(groups
            .iter()
            .find(|group| group.table.table_name == table_name)
            .and_then(|group| group.title.clone()))
    }
}
