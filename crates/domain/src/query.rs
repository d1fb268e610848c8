//! Structured query for the activity logging summary.
//!
//! The query unions the primary activity log with every custom-field log table, wraps the union
//! as the derived relation `activity_log`, left-joins actor and activity-type lookups and applies
//! the date window, ordering and paging. Rendering lives in [`render`].

use std::sync::Arc;

use chrono::NaiveDateTime;
use logreport_core::{AppError, AppResult};

use crate::{
    DateRangeFilter, LogSource, LogSources, PageWindow, ReportColumn, ReportSchema, ReportSort,
    SqlIdentifier, SqlStringLiteral,
};

mod render;

pub use render::{QueryParam, RenderedQuery};

/// Alias of the derived relation wrapping the union.
pub const UNION_ALIAS: &str = "activity_log";

const PRIMARY_BRANCH_ALIAS: &str = "log_a";
const CONTACT_ALIAS: &str = "c";
const OPTION_GROUP_ALIAS: &str = "og_atype";
const OPTION_VALUE_ALIAS: &str = "ov_atype";

/// Branch columns holding integer keys; every branch widens them to `BIGINT`.
pub const BIGINT_BRANCH_COLUMNS: [&str; 3] = ["id", "log_user_id", "activity_type_id"];

/// Column list every union branch selects, in order.
pub const BRANCH_COLUMNS: [&str; 6] = [
    "id",
    "log_user_id",
    "log_date",
    "log_action",
    "activity_type_id",
    "subject",
];

/// Qualified column reference, `relation.column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Table or derived relation alias.
    pub relation: String,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    fn new(relation: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            column: column.into(),
        }
    }
}

/// Value selected for one branch column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchValue {
    /// Column of the branch table.
    Column(String),
    /// SQL `NULL`, for fields the source does not have.
    Null,
    /// Escaped string literal.
    Literal(SqlStringLiteral),
}

/// One `SELECT` of the union, reading a single log table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionBranch {
    table: SqlIdentifier,
    alias: String,
    values: [BranchValue; 6],
}

impl UnionBranch {
    fn for_source(source: &LogSource, custom_index: usize) -> AppResult<Self> {
        if source.is_primary() {
            return Ok(Self {
                table: source.table_name().clone(),
                alias: PRIMARY_BRANCH_ALIAS.to_owned(),
                values: BRANCH_COLUMNS.map(|column| BranchValue::Column(column.to_owned())),
            });
        }

        Ok(Self {
            table: source.table_name().clone(),
            alias: format!("logt{custom_index}"),
            values: [
                BranchValue::Column("entity_id".to_owned()),
                BranchValue::Column("log_user_id".to_owned()),
                BranchValue::Column("log_date".to_owned()),
                BranchValue::Column("log_action".to_owned()),
                BranchValue::Null,
                BranchValue::Literal(source.synthesized_subject()?),
            ],
        })
    }

    /// Returns the log table read by this branch.
    #[must_use]
    pub fn table(&self) -> &SqlIdentifier {
        &self.table
    }

    /// Returns the table alias used inside the branch.
    #[must_use]
    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    /// Returns `(value, output column)` pairs in select order.
    pub fn columns(&self) -> impl Iterator<Item = (&BranchValue, &'static str)> {
        self.values.iter().zip(BRANCH_COLUMNS)
    }
}

/// Union branches derived once from a report instance's log sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogUnion(Arc<[UnionBranch]>);

impl LogUnion {
    /// Folds the sources into branches in discovery order.
    pub fn from_sources(sources: &LogSources) -> AppResult<Self> {
        let mut custom_index = 0;
        let mut branches = Vec::with_capacity(sources.len());
        for source in sources.iter() {
            if !source.is_primary() {
                custom_index += 1;
            }
            branches.push(UnionBranch::for_source(source, custom_index)?);
        }

        if branches.is_empty() {
            return Err(AppError::Configuration(
                "activity log union needs at least one source".to_owned(),
            ));
        }

        Ok(Self(branches.into()))
    }

    /// Returns branches in union order.
    #[must_use]
    pub fn branches(&self) -> &[UnionBranch] {
        &self.0
    }
}

/// `ON` condition of a lookup join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinCondition {
    /// `left = right`.
    Columns(ColumnRef, ColumnRef),
    /// `left = CAST(right AS TEXT)`, for option values stored as text.
    ColumnAsText(ColumnRef, ColumnRef),
    /// `column = 'literal'`.
    Literal(ColumnRef, SqlStringLiteral),
    /// Conjunction of conditions.
    All(Vec<JoinCondition>),
}

/// `LEFT JOIN table alias ON condition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupJoin {
    /// Joined table.
    pub table: SqlIdentifier,
    /// Alias of the joined table.
    pub alias: String,
    /// Join condition.
    pub condition: JoinCondition,
}

/// Comparison used by date predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `>=`
    AtLeast,
    /// `<=`
    AtMost,
}

/// `column <comparison> $n` with a bound timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePredicate {
    /// Compared column.
    pub column: ColumnRef,
    /// Comparison operator.
    pub comparison: Comparison,
    /// Bound value.
    pub value: NaiveDateTime,
}

/// Output expression of the outer select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    /// Selected column.
    pub source: ColumnRef,
    /// Output name.
    pub alias: &'static str,
    /// Widen the column to `BIGINT` so integer keys of any width decode alike.
    pub as_bigint: bool,
}

/// Fully described activity log query, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityLogQuery {
    outputs: Vec<OutputColumn>,
    union: LogUnion,
    joins: Vec<LookupJoin>,
    predicates: Vec<DatePredicate>,
    sort: ReportSort,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl ActivityLogQuery {
    /// Assembles the query for one search submission.
    pub fn build(
        schema: &ReportSchema,
        union: &LogUnion,
        filter: &DateRangeFilter,
        sort: Option<ReportSort>,
        window: PageWindow,
    ) -> AppResult<Self> {
        let limit = i64::try_from(window.limit).map_err(|error| {
            AppError::Validation(format!("invalid activity log page limit: {error}"))
        })?;
        let offset = i64::try_from(window.offset).map_err(|error| {
            AppError::Validation(format!("invalid activity log page offset: {error}"))
        })?;

        let log_date = ColumnRef::new(UNION_ALIAS, "log_date");
        let mut predicates = Vec::with_capacity(2);
        if let Some(value) = filter.lower_bound() {
            predicates.push(DatePredicate {
                column: log_date.clone(),
                comparison: Comparison::AtLeast,
                value,
            });
        }
        if let Some(value) = filter.upper_bound() {
            predicates.push(DatePredicate {
                column: log_date,
                comparison: Comparison::AtMost,
                value,
            });
        }

        Ok(Self {
            outputs: output_columns(),
            union: union.clone(),
            joins: lookup_joins(schema),
            predicates,
            sort: sort.unwrap_or_default(),
            limit: (limit > 0).then_some(limit),
            offset: (offset > 0).then_some(offset),
        })
    }

    /// Returns the union branches.
    #[must_use]
    pub fn branches(&self) -> &[UnionBranch] {
        self.union.branches()
    }

    /// Returns the lookup joins.
    #[must_use]
    pub fn joins(&self) -> &[LookupJoin] {
        &self.joins
    }

    /// Returns the date predicates; empty means "match everything".
    #[must_use]
    pub fn predicates(&self) -> &[DatePredicate] {
        &self.predicates
    }

    /// Returns the effective ordering.
    #[must_use]
    pub fn sort(&self) -> ReportSort {
        self.sort
    }

    /// Renders the page query.
    #[must_use]
    pub fn to_sql(&self) -> RenderedQuery {
        render::render_page(self)
    }

    /// Renders the total-row-count query for the same filter.
    #[must_use]
    pub fn to_count_sql(&self) -> RenderedQuery {
        render::render_count(self)
    }
}

fn output_columns() -> Vec<OutputColumn> {
    vec![
        OutputColumn {
            source: ColumnRef::new(UNION_ALIAS, "id"),
            alias: ReportColumn::Id.field(),
            as_bigint: false,
        },
        OutputColumn {
            source: ColumnRef::new(UNION_ALIAS, "log_user_id"),
            alias: "log_user_id",
            as_bigint: false,
        },
        OutputColumn {
            source: ColumnRef::new(UNION_ALIAS, "log_date"),
            alias: ReportColumn::LogDate.field(),
            as_bigint: false,
        },
        OutputColumn {
            source: ColumnRef::new(UNION_ALIAS, "log_action"),
            alias: ReportColumn::LogAction.field(),
            as_bigint: false,
        },
        OutputColumn {
            source: ColumnRef::new(UNION_ALIAS, "activity_type_id"),
            alias: "activity_type_id",
            as_bigint: false,
        },
        OutputColumn {
            source: ColumnRef::new(UNION_ALIAS, "subject"),
            alias: ReportColumn::Subject.field(),
            as_bigint: false,
        },
        OutputColumn {
            source: ColumnRef::new(OPTION_VALUE_ALIAS, "label"),
            alias: ReportColumn::ActivityType.field(),
            as_bigint: false,
        },
        OutputColumn {
            source: ColumnRef::new(CONTACT_ALIAS, "sort_name"),
            alias: ReportColumn::SortName.field(),
            as_bigint: false,
        },
        OutputColumn {
            source: ColumnRef::new(CONTACT_ALIAS, "id"),
            alias: ReportColumn::AlteredByContactId.field(),
            as_bigint: true,
        },
    ]
}

fn lookup_joins(schema: &ReportSchema) -> Vec<LookupJoin> {
    vec![
        LookupJoin {
            table: schema.contact_table().clone(),
            alias: CONTACT_ALIAS.to_owned(),
            condition: JoinCondition::Columns(
                ColumnRef::new(CONTACT_ALIAS, "id"),
                ColumnRef::new(UNION_ALIAS, "log_user_id"),
            ),
        },
        LookupJoin {
            table: schema.option_group_table().clone(),
            alias: OPTION_GROUP_ALIAS.to_owned(),
            condition: JoinCondition::Literal(
                ColumnRef::new(OPTION_GROUP_ALIAS, "name"),
                schema.activity_type_option_group().clone(),
            ),
        },
        LookupJoin {
            table: schema.option_value_table().clone(),
            alias: OPTION_VALUE_ALIAS.to_owned(),
            condition: JoinCondition::All(vec![
                JoinCondition::Columns(
                    ColumnRef::new(OPTION_GROUP_ALIAS, "id"),
                    ColumnRef::new(OPTION_VALUE_ALIAS, "option_group_id"),
                ),
                JoinCondition::ColumnAsText(
                    ColumnRef::new(OPTION_VALUE_ALIAS, "value"),
                    ColumnRef::new(UNION_ALIAS, "activity_type_id"),
                ),
            ]),
        },
    ]
}
