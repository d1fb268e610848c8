use logreport_core::AppResult;
use logreport_domain::{
    ActivityLogQuery, DateRangeFilter, LogSource, LogSources, LogUnion, PageWindow, ReportColumn,
    ReportSchema, ReportSort,
};

use crate::CustomDataSchema;

/// Entity whose custom-field log tables join the report.
pub const ACTIVITY_ENTITY: &str = "Activity";

/// One instance of the activity logging summary.
///
/// Log sources are discovered when the instance is created and reused for every query the
/// instance builds.
#[derive(Debug, Clone)]
pub struct ActivityLoggingReport {
    schema: ReportSchema,
    union: LogUnion,
}

impl ActivityLoggingReport {
    /// Discovers the primary and custom-field log sources.
    pub async fn discover(
        schema: ReportSchema,
        custom_data_schema: &dyn CustomDataSchema,
    ) -> AppResult<Self> {
        let mut sources = vec![LogSource::primary(schema.primary_log_table().as_str())?];

        for custom_table in custom_data_schema
            .log_tables_for_entity(ACTIVITY_ENTITY)
            .await?
        {
            let title = custom_data_schema
                .custom_group_title(custom_table.table_name.as_str())
                .await?;
            sources.push(LogSource::custom(
                custom_table.log_table_name,
                title.as_deref(),
            )?);
        }

        Self::from_sources(schema, LogSources::new(sources)?)
    }

    /// Creates an instance from already discovered sources.
    pub fn from_sources(schema: ReportSchema, sources: LogSources) -> AppResult<Self> {
        let union = LogUnion::from_sources(&sources)?;
        Ok(Self { schema, union })
    }

    /// Returns displayable columns in order.
    #[must_use]
    pub fn columns(&self) -> &'static [ReportColumn] {
        ReportColumn::all()
    }

    /// Builds the query for one page of results.
    pub fn build_query(
        &self,
        filter: &DateRangeFilter,
        sort: Option<ReportSort>,
        window: PageWindow,
    ) -> AppResult<ActivityLogQuery> {
        ActivityLogQuery::build(&self.schema, &self.union, filter, sort, window)
    }
}
