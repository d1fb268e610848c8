use std::fmt::Write as _;

use chrono::NaiveDateTime;

use super::{
    ActivityLogQuery, BIGINT_BRANCH_COLUMNS, BranchValue, ColumnRef, Comparison, JoinCondition,
    ReportColumn, UNION_ALIAS,
};

/// Value bound to a `$n` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryParam {
    /// Timestamp without time zone.
    Timestamp(NaiveDateTime),
    /// 64-bit integer.
    BigInt(i64),
}

/// PostgreSQL statement text with its bound parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery {
    /// Statement text using `$1..$n` placeholders.
    pub sql: String,
    /// Parameters; `params[0]` binds `$1`.
    pub params: Vec<QueryParam>,
}

struct SqlWriter {
    sql: String,
    params: Vec<QueryParam>,
}

impl SqlWriter {
    fn new() -> Self {
        Self {
            sql: String::with_capacity(1024),
            params: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    fn push_column(&mut self, column: &ColumnRef) {
        let _ = write!(self.sql, "{}.{}", column.relation, column.column);
    }

    fn push_bind(&mut self, param: QueryParam) {
        self.params.push(param);
        let _ = write!(self.sql, "${}", self.params.len());
    }

    fn finish(self) -> RenderedQuery {
        RenderedQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

pub(super) fn render_page(query: &ActivityLogQuery) -> RenderedQuery {
    let mut writer = SqlWriter::new();

    writer.push("SELECT ");
    for (index, output) in query.outputs.iter().enumerate() {
        if index > 0 {
            writer.push(", ");
        }
        if output.as_bigint {
            writer.push("CAST(");
            writer.push_column(&output.source);
            writer.push(" AS BIGINT)");
        } else {
            writer.push_column(&output.source);
        }
        writer.push(" AS ");
        writer.push(output.alias);
    }

    push_union_relation(&mut writer, query);

    for join in &query.joins {
        writer.push(" LEFT JOIN ");
        writer.push(join.table.as_str());
        writer.push(" ");
        writer.push(join.alias.as_str());
        writer.push(" ON ");
        push_join_condition(&mut writer, &join.condition);
    }

    push_where(&mut writer, query);

    writer.push(" ORDER BY ");
    writer.push(query.sort.column.field());
    writer.push(" ");
    writer.push(query.sort.direction.as_sql());
    if query.sort.column != ReportColumn::Id {
        writer.push(", ");
        writer.push(ReportColumn::Id.field());
        writer.push(" DESC");
    }

    if let Some(limit) = query.limit {
        writer.push(" LIMIT ");
        writer.push_bind(QueryParam::BigInt(limit));
    }
    if let Some(offset) = query.offset {
        writer.push(" OFFSET ");
        writer.push_bind(QueryParam::BigInt(offset));
    }

    writer.finish()
}

pub(super) fn render_count(query: &ActivityLogQuery) -> RenderedQuery {
    let mut writer = SqlWriter::new();
    writer.push("SELECT COUNT(*) AS total");
    push_union_relation(&mut writer, query);
    push_where(&mut writer, query);
    writer.finish()
}

fn push_union_relation(writer: &mut SqlWriter, query: &ActivityLogQuery) {
    writer.push(" FROM (");
    for (index, branch) in query.branches().iter().enumerate() {
        if index > 0 {
            writer.push(" UNION ");
        }

        writer.push("SELECT ");
        for (column_index, (value, output)) in branch.columns().enumerate() {
            if column_index > 0 {
                writer.push(", ");
            }
            let widen = BIGINT_BRANCH_COLUMNS.contains(&output);
            if widen {
                writer.push("CAST(");
            }
            match value {
                BranchValue::Column(column) => {
                    writer.push(branch.alias());
                    writer.push(".");
                    writer.push(column.as_str());
                }
                BranchValue::Null => writer.push("NULL"),
                BranchValue::Literal(literal) => writer.push(literal.to_sql().as_str()),
            }
            if widen {
                writer.push(" AS BIGINT)");
            }
            writer.push(" AS ");
            writer.push(output);
        }
        writer.push(" FROM ");
        writer.push(branch.table().as_str());
        writer.push(" ");
        writer.push(branch.alias());
    }
    writer.push(") AS ");
    writer.push(UNION_ALIAS);
}

fn push_join_condition(writer: &mut SqlWriter, condition: &JoinCondition) {
    match condition {
        JoinCondition::Columns(left, right) => {
            writer.push_column(left);
            writer.push(" = ");
            writer.push_column(right);
        }
        JoinCondition::ColumnAsText(left, right) => {
            writer.push_column(left);
            writer.push(" = CAST(");
            writer.push_column(right);
            writer.push(" AS TEXT)");
        }
        JoinCondition::Literal(column, literal) => {
            writer.push_column(column);
            writer.push(" = ");
            writer.push(literal.to_sql().as_str());
        }
        JoinCondition::All(conditions) => {
            for (index, nested) in conditions.iter().enumerate() {
                if index > 0 {
                    writer.push(" AND ");
                }
                push_join_condition(writer, nested);
            }
        }
    }
}

fn push_where(writer: &mut SqlWriter, query: &ActivityLogQuery) {
    writer.push(" WHERE ");
    if query.predicates.is_empty() {
        writer.push("TRUE");
        return;
    }

    for (index, predicate) in query.predicates.iter().enumerate() {
        if index > 0 {
            writer.push(" AND ");
        }
        writer.push_column(&predicate.column);
        writer.push(match predicate.comparison {
            Comparison::AtLeast => " >= ",
            Comparison::AtMost => " <= ",
        });
        writer.push_bind(QueryParam::Timestamp(predicate.value));
    }
}
