use chrono::NaiveDate;
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("removal_date is required")]
    MissingRemovalDate,
    #[error("{field} is not a YYYY-MM-DD date: {value:?}")]
    MalformedDate { field: &'static str, value: String },
    #[error("deprecated_date {deprecated} is after removal_date {removal}")]
    DeprecatedAfterRemoval {
        deprecated: NaiveDate,
        removal: NaiveDate,
    },
    #[error("malformed deprecation object: {0}")]
    Malformed(String),
}

/// Raised when an overdue command with `enforce_removal` is executed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("command was removed on {removal_date} ({days_ago} days ago)")]
pub struct CommandRemovedError {
    pub removal_date: NaiveDate,
    pub days_ago: i64,
    pub alternative: Option<String>,
}

/// One metadata entry that could not be applied. Sync continues past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataParseWarning {
    pub index: usize,
    pub key: Option<String>,
    pub reason: String,
}

impl fmt::Display for MetadataParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "meta entry #{} ({}): {}", self.index, key, self.reason),
            None => write!(f, "meta entry #{}: {}", self.index, self.reason),
        }
    }
}
