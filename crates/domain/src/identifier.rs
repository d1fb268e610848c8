use std::fmt::{Display, Formatter};

use logreport_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// PostgreSQL truncates identifiers longer than this many bytes.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Table or column name that is safe to interpolate into generated SQL unquoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SqlIdentifier(String);

impl SqlIdentifier {
    /// Validates an identifier against `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let mut characters = value.chars();

        let Some(first) = characters.next() else {
            return Err(AppError::InjectionRisk(
                "sql identifier must not be empty".to_owned(),
            ));
        };

        if !(first.is_ascii_alphabetic() || first == '_') {
            return Err(AppError::InjectionRisk(format!(
                "sql identifier '{}' must start with a letter or underscore",
                value.escape_debug()
            )));
        }

        if characters.any(|character| !(character.is_ascii_alphanumeric() || character == '_')) {
            return Err(AppError::InjectionRisk(format!(
                "sql identifier '{}' contains characters outside [A-Za-z0-9_]",
                value.escape_debug()
            )));
        }

        if value.len() > MAX_IDENTIFIER_LENGTH {
            return Err(AppError::InjectionRisk(format!(
                "sql identifier '{value}' exceeds {MAX_IDENTIFIER_LENGTH} bytes"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for SqlIdentifier {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for SqlIdentifier {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SqlIdentifier> for String {
    fn from(value: SqlIdentifier) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use logreport_core::AppError;

    use super::SqlIdentifier;

    #[test]
    fn accepts_plain_table_names() {
        let identifier = SqlIdentifier::new("log_civicrm_value_extra_12");
        assert!(identifier.is_ok());
    }

    #[test]
    fn rejects_statement_terminators_and_quotes() {
        for candidate in [
            "log_civicrm_activity; DROP TABLE x",
            "log\"quoted",
            "name with space",
            "1starts_with_digit",
            "",
        ] {
            let result = SqlIdentifier::new(candidate);
            assert!(
                matches!(result, Err(AppError::InjectionRisk(_))),
                "expected rejection for {candidate:?}"
            );
        }
    }

    #[test]
    fn rejects_identifiers_longer_than_postgres_limit() {
        let result = SqlIdentifier::new("a".repeat(64));
        assert!(matches!(result, Err(AppError::InjectionRisk(_))));
    }
}
