//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_custom_data_schema;
mod postgres_activity_log_reader;
mod postgres_custom_data_schema;

pub use in_memory_custom_data_schema::InMemoryCustomDataSchema;
pub use postgres_activity_log_reader::PostgresActivityLogReader;
pub use postgres_custom_data_schema::{
    DEFAULT_CUSTOM_GROUP_TABLE, LOG_TABLE_PREFIX, PostgresCustomDataSchema,
};
