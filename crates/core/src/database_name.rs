//! Logical database name type
//!
//! One server hosts many independent logical databases. Each is addressed
//! by a [`DatabaseName`]; the default "system" database has no name at all
//! and is represented by `Option::<DatabaseName>::None` wherever a binding
//! is stored.
//!
//! ## Validation
//!
//! Database names must:
//! - Be 1-128 characters
//! - Contain only alphanumeric, dash, underscore, dot
//! - Start with an alphanumeric character or underscore
//! - Not be `system` in any letter case

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DatabaseNameError;

/// Maximum length of a database name
pub const MAX_DATABASE_NAME_LENGTH: usize = 128;

/// Name the server keeps for itself
pub const RESERVED_SYSTEM_NAME: &str = "system";

/// Validated name of a logical database
///
/// ## Examples
///
/// Valid names:
/// - "db1"
/// - "tenant-42"
/// - "orders.eu_west"
///
/// Invalid names:
/// - "" (empty)
/// - "-leading-dash"
/// - "has spaces"
/// - "System" (reserved)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatabaseName(String);

impl DatabaseName {
    /// Create a new DatabaseName, validating the input
    ///
    /// # Errors
    ///
    /// Returns `DatabaseNameError` if the name breaks a naming rule.
    pub fn new(name: impl Into<String>) -> Result<Self, DatabaseNameError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(DatabaseName(name))
    }

    /// Validate a database name
    pub fn validate(name: &str) -> Result<(), DatabaseNameError> {
        let first = match name.chars().next() {
            Some(c) => c,
            None => return Err(DatabaseNameError::Empty),
        };

        if name.len() > MAX_DATABASE_NAME_LENGTH {
            return Err(DatabaseNameError::TooLong {
                length: name.len(),
                max: MAX_DATABASE_NAME_LENGTH,
            });
        }

        if !first.is_ascii_alphanumeric() && first != '_' {
            return Err(DatabaseNameError::InvalidStart { char: first });
        }

        for (pos, ch) in name.chars().enumerate() {
            if !Self::is_valid_char(ch) {
                return Err(DatabaseNameError::InvalidChar {
                    char: ch,
                    position: pos,
                });
            }
        }

        if name.eq_ignore_ascii_case(RESERVED_SYSTEM_NAME) {
            return Err(DatabaseNameError::Reserved {
                name: name.to_string(),
            });
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for DatabaseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DatabaseName {
    type Error = DatabaseNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DatabaseName::new(value)
    }
}

impl TryFrom<&str> for DatabaseName {
    type Error = DatabaseNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        DatabaseName::new(value)
    }
}

impl From<DatabaseName> for String {
    fn from(name: DatabaseName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_database_name_valid() {
        assert!(DatabaseName::new("db1").is_ok());
        assert!(DatabaseName::new("tenant-42").is_ok());
        assert!(DatabaseName::new("orders.eu_west").is_ok());
        assert!(DatabaseName::new("_private").is_ok());
        assert!(DatabaseName::new("Northwind").is_ok());
    }

    #[test]
    fn test_database_name_empty() {
        assert_eq!(DatabaseName::new("").unwrap_err(), DatabaseNameError::Empty);
    }

    #[test]
    fn test_database_name_too_long() {
        let err = DatabaseName::new("a".repeat(MAX_DATABASE_NAME_LENGTH + 1)).unwrap_err();
        assert!(matches!(err, DatabaseNameError::TooLong { max: 128, .. }));
        assert!(DatabaseName::new("a".repeat(MAX_DATABASE_NAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_database_name_invalid_start() {
        let err = DatabaseName::new("-dash").unwrap_err();
        assert!(matches!(err, DatabaseNameError::InvalidStart { char: '-' }));

        let err = DatabaseName::new(".dot").unwrap_err();
        assert!(matches!(err, DatabaseNameError::InvalidStart { char: '.' }));
    }

    #[test]
    fn test_database_name_invalid_chars() {
        let err = DatabaseName::new("has space").unwrap_err();
        assert!(matches!(
            err,
            DatabaseNameError::InvalidChar { char: ' ', position: 3 }
        ));

        let err = DatabaseName::new("a/b").unwrap_err();
        assert!(matches!(err, DatabaseNameError::InvalidChar { char: '/', .. }));
    }

    #[test]
    fn test_system_is_reserved_in_any_case() {
        assert!(matches!(
            DatabaseName::new("system").unwrap_err(),
            DatabaseNameError::Reserved { .. }
        ));
        assert!(matches!(
            DatabaseName::new("SyStEm").unwrap_err(),
            DatabaseNameError::Reserved { .. }
        ));
        assert!(DatabaseName::new("system2").is_ok());
    }

    #[test]
    fn test_database_name_display() {
        let name = DatabaseName::new("db1").unwrap();
        assert_eq!(name.to_string(), "db1");
        assert_eq!(name.as_str(), "db1");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: DatabaseName = serde_json::from_str("\"db1\"").unwrap();
        assert_eq!(ok.as_str(), "db1");
        assert!(serde_json::from_str::<DatabaseName>("\"bad name\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_valid_charset_is_accepted(name in "[a-zA-Z0-9_][a-zA-Z0-9_.-]{0,60}") {
            prop_assume!(!name.eq_ignore_ascii_case(RESERVED_SYSTEM_NAME));
            prop_assert!(DatabaseName::new(name).is_ok());
        }

        #[test]
        fn prop_any_slash_is_rejected(a in "[a-z]{1,10}", b in "[a-z]{0,10}") {
            let name = format!("{}/{}", a, b);
            let rejected = matches!(
                DatabaseName::new(name),
                Err(DatabaseNameError::InvalidChar { char: '/', .. })
            );
            prop_assert!(rejected);
        }
    }
}
