use logreport_core::{AppError, AppResult};

/// Text that may be embedded into generated SQL as a string literal.
///
/// Rendering follows PostgreSQL `quote_literal`: single quotes and backslashes are doubled and
/// the literal gets an `E` prefix when it contains a backslash, so the value survives regardless
/// of `standard_conforming_strings`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlStringLiteral(String);

impl SqlStringLiteral {
    /// Accepts text without control characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if let Some(character) = value.chars().find(|character| character.is_control()) {
            return Err(AppError::InjectionRisk(format!(
                "text '{}' contains control character {:?} that cannot be embedded in sql",
                value.escape_debug(),
                character
            )));
        }

        Ok(Self(value))
    }

    /// Returns the raw, unescaped value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the quoted and escaped SQL literal.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let needs_escape_prefix = self.0.contains('\\');
        let mut rendered = String::with_capacity(self.0.len() + 3);
        if needs_escape_prefix {
            rendered.push('E');
        }
        rendered.push('\'');
        for character in self.0.chars() {
            match character {
                '\'' => rendered.push_str("''"),
                '\\' => rendered.push_str("\\\\"),
                other => rendered.push(other),
            }
        }
        rendered.push('\'');
        rendered
    }
}
