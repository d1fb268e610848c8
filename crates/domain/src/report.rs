use std::fmt::{Display, Formatter};
use std::str::FromStr;

use logreport_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Stable name under which the activity logging summary is registered.
pub const ACTIVITY_LOGGING_SUMMARY: &str = "activity_logging_summary";

/// Registration record of a search report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDescriptor {
    name: NonEmptyString,
    label: NonEmptyString,
    description: NonEmptyString,
}

impl ReportDescriptor {
    /// Creates a descriptor with validated fields.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            label: NonEmptyString::new(label)?,
            description: NonEmptyString::new(description)?,
        })
    }

    /// Descriptor of the activity logging summary.
    pub fn activity_logging_summary() -> AppResult<Self> {
        Self::new(
            ACTIVITY_LOGGING_SUMMARY,
            "Activity Logging Summary",
            "Activity Logging Summary",
        )
    }

    /// Returns the stable report name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &NonEmptyString {
        &self.description
    }
}

/// Displayable result columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportColumn {
    /// Alteration timestamp.
    LogDate,
    /// Insert, update or delete.
    LogAction,
    /// Activity type label.
    ActivityType,
    /// Activity subject or custom-group label.
    Subject,
    /// Name of the contact that made the change.
    SortName,
    /// Activity identifier.
    Id,
    /// Identifier of the contact that made the change.
    AlteredByContactId,
}

impl ReportColumn {
    /// Returns all columns in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ReportColumn] = &[
            ReportColumn::LogDate,
            ReportColumn::LogAction,
            ReportColumn::ActivityType,
            ReportColumn::Subject,
            ReportColumn::SortName,
            ReportColumn::Id,
            ReportColumn::AlteredByContactId,
        ];

        ALL
    }

    /// Returns the column header.
    #[must_use]
    pub fn header(&self) -> &'static str {
        match self {
            Self::LogDate => "Altered On",
            Self::LogAction => "Action",
            Self::ActivityType => "Type",
            Self::Subject => "Subject",
            Self::SortName => "Altered By",
            Self::Id => "ID",
            Self::AlteredByContactId => "Altered By ID",
        }
    }

    /// Returns the result field backing the column.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::LogDate => "log_date",
            Self::LogAction => "log_action",
            Self::ActivityType => "activity_type",
            Self::Subject => "subject",
            Self::SortName => "sort_name",
            Self::Id => "id",
            Self::AlteredByContactId => "altered_by_contact_id",
        }
    }
}

/// Relation aliases a column name may be qualified with.
const COLUMN_QUALIFIERS: [&str; 2] = ["activity_log", "contact_a"];

impl FromStr for ReportColumn {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let field = match trimmed.split_once('.') {
            None => trimmed,
            Some((qualifier, field)) if COLUMN_QUALIFIERS.contains(&qualifier) => field,
            Some((qualifier, _)) => {
                return Err(AppError::Validation(format!(
                    "unknown column qualifier '{qualifier}' in '{value}'"
                )));
            }
        };

        Self::all()
            .iter()
            .copied()
            .find(|column| column.field().eq_ignore_ascii_case(field))
            .ok_or_else(|| AppError::Validation(format!("unknown report column '{value}'")))
    }
}

/// Sort direction for report ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Column and direction used to order report rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSort {
    /// Sorted column.
    pub column: ReportColumn,
    /// Sort direction.
    pub direction: SortDirection,
}

impl ReportSort {
    /// Creates a sort definition.
    #[must_use]
    pub fn new(column: ReportColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }
}

impl Default for ReportSort {
    /// Newest alterations first.
    fn default() -> Self {
        Self::new(ReportColumn::LogDate, SortDirection::Desc)
    }
}

impl FromStr for ReportSort {
    type Err = AppError;

    /// Parses `"<field> [asc|desc]"`; direction defaults to ascending.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split_whitespace();
        let Some(field) = parts.next() else {
            return Err(AppError::Validation(
                "sort expression must name a column".to_owned(),
            ));
        };

        let column = field.parse::<ReportColumn>()?;
        let direction = match parts.next() {
            None => SortDirection::Asc,
            Some(direction) if direction.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(direction) if direction.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(direction) => {
                return Err(AppError::Validation(format!(
                    "unknown sort direction '{direction}'"
                )));
            }
        };

        if parts.next().is_some() {
            return Err(AppError::Validation(format!(
                "sort expression '{value}' has trailing tokens"
            )));
        }

        Ok(Self::new(column, direction))
    }
}

impl Display for ReportSort {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} {}", self.column.field(), self.direction.as_sql())
    }
}

/// Offset pagination window. A `limit` of zero means "no limit".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Rows skipped.
    pub offset: u64,
    /// Maximum rows returned, zero for all.
    pub limit: u64,
}

impl PageWindow {
    /// Creates a page window.
    #[must_use]
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// All rows.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{ReportColumn, ReportDescriptor, ReportSort, SortDirection};

    #[test]
    fn columns_keep_display_order() {
        let headers: Vec<_> = ReportColumn::all()
            .iter()
            .map(|column| (column.header(), column.field()))
            .collect();

        assert_eq!(
            headers,
            vec![
                ("Altered On", "log_date"),
                ("Action", "log_action"),
                ("Type", "activity_type"),
                ("Subject", "subject"),
                ("Altered By", "sort_name"),
                ("ID", "id"),
                ("Altered By ID", "altered_by_contact_id"),
            ]
        );
    }

    #[test]
    fn sort_expression_accepts_qualified_fields() {
        let sort = "contact_a.log_date DESC".parse::<ReportSort>();
        assert_eq!(
            sort.ok(),
            Some(ReportSort::new(ReportColumn::LogDate, SortDirection::Desc))
        );

        let sort = "sort_name".parse::<ReportSort>();
        assert_eq!(
            sort.ok(),
            Some(ReportSort::new(ReportColumn::SortName, SortDirection::Asc))
        );
    }

    #[test]
    fn only_known_relations_may_qualify_a_column() {
        assert_eq!(
            "activity_log.id".parse::<ReportColumn>().ok(),
            Some(ReportColumn::Id)
        );
        for column in [
            "x.y.log_date",
            "c.sort_name",
            "activity_log.x.log_date",
            ".log_date",
            "log_a.subject",
        ] {
            assert!(
                column.parse::<ReportColumn>().is_err(),
                "expected rejection for {column:?}"
            );
        }
        assert!("og_atype.activity_type asc".parse::<ReportSort>().is_err());
    }

    #[test]
    fn sort_expression_rejects_arbitrary_sql() {
        for expression in [
            "log_date; DROP TABLE civicrm_contact",
            "log_date DESC, id",
            "log_date sideways",
            "(SELECT 1)",
            "",
        ] {
            assert!(
                expression.parse::<ReportSort>().is_err(),
                "expected rejection for {expression:?}"
            );
        }
    }

    #[test]
    fn default_sort_is_newest_first() {
        assert_eq!(ReportSort::default().to_string(), "log_date DESC");
    }

    #[test]
    fn descriptor_matches_registration() {
        let descriptor = ReportDescriptor::activity_logging_summary();
        assert!(descriptor.is_ok_and(|descriptor| {
            descriptor.name().as_str() == "activity_logging_summary"
                && descriptor.label().as_str() == "Activity Logging Summary"
        }));
    }
}
