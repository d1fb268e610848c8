use std::sync::Arc;

use logreport_core::{AppError, AppResult};

use crate::{SqlIdentifier, SqlStringLiteral};

/// Marker appended to the subject of rows that come from custom-field log tables.
pub const CUSTOM_SUBJECT_MARKER: &str = "custom";

/// One audit table contributing rows to the activity logging summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSource {
    table_name: SqlIdentifier,
    display_label: SqlStringLiteral,
    is_primary: bool,
}

impl LogSource {
    /// Creates the built-in activity log source.
    pub fn primary(table_name: impl Into<String>) -> AppResult<Self> {
        let table_name = SqlIdentifier::new(table_name)?;
        let display_label = SqlStringLiteral::new(table_name.as_str())?;

        Ok(Self {
            table_name,
            display_label,
            is_primary: true,
        })
    }

    /// Creates a custom-field log source.
    ///
    /// The label is the custom group title; when no title is configured the log table name is
    /// used instead.
    pub fn custom(table_name: impl Into<String>, title: Option<&str>) -> AppResult<Self> {
        let table_name = SqlIdentifier::new(table_name)?;
        let title = title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(table_name.as_str());
        let display_label = SqlStringLiteral::new(title)?;

        Ok(Self {
            table_name,
            display_label,
            is_primary: false,
        })
    }

    /// Returns the physical log table.
    #[must_use]
    pub fn table_name(&self) -> &SqlIdentifier {
        &self.table_name
    }

    /// Returns the human-readable label of the source.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.display_label.value()
    }

    /// Returns whether this is the built-in activity log.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Returns the literal substituted for `subject` in custom branches, e.g. `Notes [custom]`.
    pub fn synthesized_subject(&self) -> AppResult<SqlStringLiteral> {
        SqlStringLiteral::new(format!(
            "{} [{CUSTOM_SUBJECT_MARKER}]",
            self.display_label.value()
        ))
    }
}

/// Ordered, immutable set of log sources discovered for one report instance.
///
/// The primary activity log always comes first and appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSources(Arc<[LogSource]>);

impl LogSources {
    /// Validates discovery output.
    pub fn new(sources: Vec<LogSource>) -> AppResult<Self> {
        let Some(first) = sources.first() else {
            return Err(AppError::Configuration(
                "no activity log sources were discovered; is audit logging enabled?".to_owned(),
            ));
        };

        if !first.is_primary() {
            return Err(AppError::Configuration(format!(
                "first log source '{}' must be the primary activity log",
                first.table_name()
            )));
        }

        let primary_count = sources.iter().filter(|source| source.is_primary()).count();
        if primary_count > 1 {
            return Err(AppError::Configuration(format!(
                "expected one primary log source, found {primary_count}"
            )));
        }

        Ok(Self(sources.into()))
    }

    /// Returns custom-field sources in discovery order.
    #[must_use]
    pub fn custom(&self) -> &[LogSource] {
        self.0
            .split_first()
            .map(|(_, custom)| custom)
            .unwrap_or_default()
    }

    /// Iterates all sources in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &LogSource> {
        self.0.iter()
    }

    /// Returns the number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty, which construction rules out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
