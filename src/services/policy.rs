use crate::domain::errors::ValidationError;
use crate::domain::models::{DeprecationPolicy, RawPolicy};
use chrono::NaiveDate;
use serde::Deserialize;

/// Local annotation for a command, mirroring the JSON metadata fields.
///
/// ```ignore
/// let policy = Deprecation::new()
///     .removal_date("2026-03-01")
///     .alternative("meta show --json")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Deprecation {
    raw: RawPolicy,
}

impl Deprecation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn removal_date(mut self, date: &str) -> Self {
        self.raw.removal_date = Some(date.to_string());
        self
    }

    pub fn deprecated_date(mut self, date: &str) -> Self {
        self.raw.deprecated_date = Some(date.to_string());
        self
    }

    pub fn alternative(mut self, alternative: &str) -> Self {
        self.raw.alternative = Some(alternative.to_string());
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.raw.version = Some(version.to_string());
        self
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.raw.reason = Some(reason.to_string());
        self
    }

    pub fn enforce_removal(mut self, enforce: bool) -> Self {
        self.raw.enforce_removal = enforce;
        self
    }

    pub fn build(self) -> Result<DeprecationPolicy, ValidationError> {
        from_raw(self.raw)
    }
}

/// Builds a policy from the object found under a metadata entry's
/// `deprecation` key.
pub fn from_json(value: &serde_json::Value) -> Result<DeprecationPolicy, ValidationError> {
    let raw =
        RawPolicy::deserialize(value).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    from_raw(raw)
}

pub fn from_raw(raw: RawPolicy) -> Result<DeprecationPolicy, ValidationError> {
    let removal_date = match raw.removal_date.as_deref() {
        Some(s) => parse_date("removal_date", s)?,
        None => return Err(ValidationError::MissingRemovalDate),
    };
    let deprecated_date = raw
        .deprecated_date
        .as_deref()
        .map(|s| parse_date("deprecated_date", s))
        .transpose()?;

    if let Some(deprecated) = deprecated_date {
        if deprecated > removal_date {
            return Err(ValidationError::DeprecatedAfterRemoval {
                deprecated,
                removal: removal_date,
            });
        }
    }

    Ok(DeprecationPolicy {
        removal_date,
        deprecated_date,
        alternative: non_blank(raw.alternative),
        version: non_blank(raw.version),
        reason: non_blank(raw.reason),
        enforce_removal: raw.enforce_removal,
    })
}

/// Strict `YYYY-MM-DD`: exactly ten characters, zero padded, no time part.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let malformed = || ValidationError::MalformedDate {
        field,
        value: value.to_string(),
    };
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(malformed());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| malformed())
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
