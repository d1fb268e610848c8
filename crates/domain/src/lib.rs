//! Domain types and the query model of the activity logging summary.

#![forbid(unsafe_code)]

mod date_range;
mod identifier;
mod literal;
mod log_entry;
mod log_source;
pub mod query;
mod report;
mod schema;

pub use date_range::{DEFAULT_LOOKBACK_DAYS, DateRangeFilter};
pub use identifier::{MAX_IDENTIFIER_LENGTH, SqlIdentifier};
pub use literal::SqlStringLiteral;
pub use log_entry::{ActivityLogEntry, LogAction};
pub use log_source::{CUSTOM_SUBJECT_MARKER, LogSource, LogSources};
pub use query::{ActivityLogQuery, LogUnion, QueryParam, RenderedQuery};
pub use report::{
    ACTIVITY_LOGGING_SUMMARY, PageWindow, ReportColumn, ReportDescriptor, ReportSort,
    SortDirection,
};
pub use schema::ReportSchema;
