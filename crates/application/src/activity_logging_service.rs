use std::sync::Arc;

use chrono::NaiveDate;
use logreport_core::{AppError, AppResult};
use logreport_domain::{
    ActivityLogEntry, DateRangeFilter, PageWindow, ReportColumn, ReportDescriptor, ReportSchema,
    ReportSort,
};

use crate::{ActivityLogReader, ActivityLoggingReport, CustomDataSchema};

/// Page size bounds applied to search requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizePolicy {
    /// Rows per page when the request does not say.
    pub default_limit: u64,
    /// Largest page a request may ask for.
    pub max_limit: u64,
}

impl PageSizePolicy {
    /// Creates a policy, rejecting a zero or inverted configuration.
    pub fn new(default_limit: u64, max_limit: u64) -> AppResult<Self> {
        if default_limit == 0 || default_limit > max_limit {
            return Err(AppError::Configuration(format!(
                "page size default {default_limit} must be between 1 and {max_limit}"
            )));
        }

        Ok(Self {
            default_limit,
            max_limit,
        })
    }
}

impl Default for PageSizePolicy {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 500,
        }
    }
}

/// Search form submission.
///
/// A date that is `None` was not submitted and takes the form default (the last seven days). A
/// submitted blank date removes that bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLogSearch {
    /// First included day, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Last included day, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// Sort expression, `"<field> [asc|desc]"`.
    pub sort: Option<String>,
    /// Rows skipped.
    pub offset: Option<u64>,
    /// Rows returned; zero returns every row.
    pub limit: Option<u64>,
    /// Day the form defaults are computed from.
    pub today: NaiveDate,
}

/// One page of the activity logging summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLogPage {
    /// Displayable columns in order.
    pub columns: Vec<ReportColumn>,
    /// Rows of the requested page.
    pub entries: Vec<ActivityLogEntry>,
    /// Rows matching the filter across all pages.
    pub total: u64,
    /// Effective date filter.
    pub filter: DateRangeFilter,
    /// Effective ordering.
    pub sort: ReportSort,
    /// Effective window.
    pub window: PageWindow,
}

/// Application service running the activity logging summary.
#[derive(Clone)]
pub struct ActivityLoggingService {
    schema: ReportSchema,
    custom_data_schema: Arc<dyn CustomDataSchema>,
    reader: Arc<dyn ActivityLogReader>,
    page_size: PageSizePolicy,
}

impl ActivityLoggingService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        schema: ReportSchema,
        custom_data_schema: Arc<dyn CustomDataSchema>,
        reader: Arc<dyn ActivityLogReader>,
        page_size: PageSizePolicy,
    ) -> Self {
        Self {
            schema,
            custom_data_schema,
            reader,
            page_size,
        }
    }

    /// Lists registered reports.
    pub fn reports(&self) -> AppResult<Vec<ReportDescriptor>> {
        Ok(vec![ReportDescriptor::activity_logging_summary()?])
    }

    /// Returns displayable columns in order.
    #[must_use]
    pub fn columns(&self) -> &'static [ReportColumn] {
        ReportColumn::all()
    }

    /// Runs one search submission.
    pub async fn search(&self, search: ActivityLogSearch) -> AppResult<ActivityLogPage> {
        let filter = resolve_filter(&search)?;
        let sort = search
            .sort
            .as_deref()
            .map(str::trim)
            .filter(|sort| !sort.is_empty())
            .map(str::parse::<ReportSort>)
            .transpose()?
            .unwrap_or_default();
        let window = self.page_window(search.offset, search.limit);

        let report =
            ActivityLoggingReport::discover(self.schema.clone(), self.custom_data_schema.as_ref())
                .await?;
        let query = report.build_query(&filter, Some(sort), window)?;

        let total = self.reader.count(&query).await?;
        let entries = if window.offset >= total {
            Vec::new()
        } else {
            self.reader.fetch_page(&query).await?
        };

        Ok(ActivityLogPage {
            columns: report.columns().to_vec(),
            entries,
            total,
            filter,
            sort,
            window,
        })
    }

    fn page_window(&self, offset: Option<u64>, limit: Option<u64>) -> PageWindow {
        let limit = match limit {
            None => self.page_size.default_limit,
            Some(0) => 0,
            Some(limit) => limit.min(self.page_size.max_limit),
        };

        PageWindow::new(offset.unwrap_or(0), limit)
    }
}

fn resolve_filter(search: &ActivityLogSearch) -> AppResult<DateRangeFilter> {
    let defaults = DateRangeFilter::last_week(search.today);
    let start_date = match search.start_date.as_deref() {
        Some(value) => DateRangeFilter::parse(Some(value), None)?.start_date(),
        None => defaults.start_date(),
    };
    let end_date = match search.end_date.as_deref() {
        Some(value) => DateRangeFilter::parse(None, Some(value))?.end_date(),
        None => defaults.end_date(),
    };

    DateRangeFilter::new(start_date, end_date)
}
