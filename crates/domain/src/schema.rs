use logreport_core::AppResult;

use crate::{SqlIdentifier, SqlStringLiteral};

/// Physical tables the report reads besides the custom-field log tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSchema {
    primary_log_table: SqlIdentifier,
    contact_table: SqlIdentifier,
    option_group_table: SqlIdentifier,
    option_value_table: SqlIdentifier,
    activity_type_option_group: SqlStringLiteral,
}

impl ReportSchema {
    /// Creates a schema description from validated table names.
    pub fn new(
        primary_log_table: impl Into<String>,
        contact_table: impl Into<String>,
        option_group_table: impl Into<String>,
        option_value_table: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            primary_log_table: SqlIdentifier::new(primary_log_table)?,
            contact_table: SqlIdentifier::new(contact_table)?,
            option_group_table: SqlIdentifier::new(option_group_table)?,
            option_value_table: SqlIdentifier::new(option_value_table)?,
            activity_type_option_group: SqlStringLiteral::new("activity_type")?,
        })
    }

    /// Table names of a stock CiviCRM installation with logging enabled.
    pub fn civicrm() -> AppResult<Self> {
        Self::new(
            "log_civicrm_activity",
            "civicrm_contact",
            "civicrm_option_group",
            "civicrm_option_value",
        )
    }

    /// Built-in activity log table.
    #[must_use]
    pub fn primary_log_table(&self) -> &SqlIdentifier {
        &self.primary_log_table
    }

    /// Contact table used to resolve actors.
    #[must_use]
    pub fn contact_table(&self) -> &SqlIdentifier {
        &self.contact_table
    }

    /// Option group table.
    #[must_use]
    pub fn option_group_table(&self) -> &SqlIdentifier {
        &self.option_group_table
    }

    /// Option value table.
    #[must_use]
    pub fn option_value_table(&self) -> &SqlIdentifier {
        &self.option_value_table
    }

    /// Name of the option group holding activity type labels.
    #[must_use]
    pub fn activity_type_option_group(&self) -> &SqlStringLiteral {
        &self.activity_type_option_group
    }
}
