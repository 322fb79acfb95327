use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Deprecation parameters attached to one command.
///
/// Only constructed through `services::policy`, which enforces the date
/// invariants; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeprecationPolicy {
    pub removal_date: NaiveDate,
    pub deprecated_date: Option<NaiveDate>,
    pub alternative: Option<String>,
    pub version: Option<String>,
    pub reason: Option<String>,
    pub enforce_removal: bool,
}

/// Wire shape shared by the JSON metadata and local annotations.
///
/// Everything is optional here so that a missing `removal_date` surfaces as
/// a validation error rather than a serde error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPolicy {
    #[serde(default)]
    pub removal_date: Option<String>,
    #[serde(default)]
    pub deprecated_date: Option<String>,
    #[serde(default)]
    pub alternative: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub enforce_removal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    ScheduledFar,
    ScheduledSoon,
    DueToday,
    Overdue,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::ScheduledFar => "SCHEDULED_FAR",
            LifecycleState::ScheduledSoon => "SCHEDULED_SOON",
            LifecycleState::DueToday => "DUE_TODAY",
            LifecycleState::Overdue => "OVERDUE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lifecycle {
    pub state: LifecycleState,
    pub days_left: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Notice,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub runtime: String,
    pub help: String,
    pub listing_tag: &'static str,
    pub severity: Severity,
}

/// `(command, subcommand)` address of a node in the command tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CommandKey {
    pub command: String,
    pub subcommand: String,
}

impl CommandKey {
    pub fn new(command: impl Into<String>, subcommand: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            subcommand: subcommand.into(),
        }
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.command, self.subcommand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicySource {
    Local,
    Remote,
}

/// Contents of the metadata cache written at login.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetaCache {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub meta: Vec<serde_json::Value>,
}

/// Server login response as handed over by the network client.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub version: Option<String>,
    pub meta: Vec<serde_json::Value>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub strict_validation: bool,
    pub color: ColorChoice,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Serialize, Clone)]
pub struct ListItem {
    pub command: String,
    pub subcommand: String,
    pub about: String,
    pub tag: Option<String>,
}

#[derive(Serialize)]
pub struct LifecycleReport {
    pub command: String,
    pub subcommand: String,
    pub deprecated: bool,
    pub source: Option<PolicySource>,
    pub removal_date: Option<String>,
    pub state: Option<LifecycleState>,
    pub days_left: Option<i64>,
    pub severity: Option<Severity>,
    pub enforce_removal: bool,
    pub listing_tag: Option<String>,
}

#[derive(Serialize)]
pub struct LoginReport {
    pub message: String,
    pub version: Option<String>,
    pub accepted: usize,
    pub skipped: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
pub struct SessionStatus {
    pub logged_in: bool,
    pub version: Option<String>,
    pub cache_path: String,
}
