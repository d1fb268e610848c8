use std::str::FromStr;

use chrono::NaiveDateTime;
use logreport_core::AppError;
use serde::{Deserialize, Serialize};

/// Change kind recorded by the logging subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogAction {
    /// Snapshot taken when logging was switched on.
    Initialization,
    /// Row was created.
    Insert,
    /// Row was changed.
    Update,
    /// Row was removed.
    Delete,
}

impl LogAction {
    /// Returns the stored value of this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialization => "Initialization",
            Self::Insert => "Insert",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl FromStr for LogAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "initialization" => Ok(Self::Initialization),
            "insert" => Ok(Self::Insert),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!("unknown log action '{value}'"))),
        }
    }
}

/// One row of the activity logging summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Activity identifier (entity id for custom-field rows).
    pub id: i64,
    /// Contact that made the change, as recorded in the log.
    pub log_user_id: Option<i64>,
    /// When the change happened.
    pub log_date: NaiveDateTime,
    /// What kind of change happened.
    pub log_action: LogAction,
    /// Coded activity type; only set for rows from the activity log itself.
    pub activity_type_id: Option<i64>,
    /// Activity subject, or the synthesized custom-group label.
    pub subject: Option<String>,
    /// Activity type label resolved through the option group.
    pub activity_type: Option<String>,
    /// Sort name of the contact that made the change.
    pub sort_name: Option<String>,
    /// Contact that made the change, if it still exists.
    pub altered_by_contact_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::LogAction;

    #[test]
    fn parses_stored_values_case_insensitively() {
        assert_eq!("Update".parse::<LogAction>().ok(), Some(LogAction::Update));
        assert_eq!("delete".parse::<LogAction>().ok(), Some(LogAction::Delete));
        assert_eq!(
            "Initialization".parse::<LogAction>().ok(),
            Some(LogAction::Initialization)
        );
        assert!("Truncate".parse::<LogAction>().is_err());
    }
}
