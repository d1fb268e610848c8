mod activity_log_reader;
mod custom_data_schema;

pub use activity_log_reader::ActivityLogReader;
pub use custom_data_schema::{CustomDataSchema, CustomLogTable};
