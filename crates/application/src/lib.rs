//! Application services and ports.

#![forbid(unsafe_code)]

mod activity_logging_report;
mod activity_logging_service;
mod report_ports;

pub use activity_logging_report::{ACTIVITY_ENTITY, ActivityLoggingReport};
pub use activity_logging_service::{
    ActivityLogPage, ActivityLogSearch, ActivityLoggingService, PageSizePolicy,
};
pub use report_ports::{ActivityLogReader, CustomDataSchema, CustomLogTable};
