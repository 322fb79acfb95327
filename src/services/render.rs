use crate::domain::errors::CommandRemovedError;
use crate::domain::models::{DeprecationPolicy, Lifecycle, LifecycleState, RenderedMessage, Severity};
use colored::Colorize;

pub const RULE_WIDTH: usize = 60;
pub const TAG_DEPRECATED: &str = "[DEPRECATED]";
pub const TAG_REMOVED: &str = "[REMOVED]";

pub fn severity(state: LifecycleState) -> Severity {
    match state {
        LifecycleState::ScheduledFar => Severity::Notice,
        _ => Severity::Urgent,
    }
}

pub fn listing_tag(state: LifecycleState) -> &'static str {
    match state {
        LifecycleState::Overdue => TAG_REMOVED,
        _ => TAG_DEPRECATED,
    }
}

pub fn render(policy: &DeprecationPolicy, lifecycle: Lifecycle) -> RenderedMessage {
    let date = policy.removal_date;
    let days = lifecycle.days_left;
    let status = match lifecycle.state {
        LifecycleState::ScheduledFar => {
            format!("Scheduled for removal on: {date} ({days} days left)")
        }
        LifecycleState::ScheduledSoon => format!("Will be REMOVED in {days} days on: {date}"),
        LifecycleState::DueToday => format!("Will be REMOVED TODAY on: {date}"),
        LifecycleState::Overdue => format!(
            "REMOVAL DATE PASSED on: {date} ({} days ago)",
            days.unsigned_abs()
        ),
    };

    let mut lines = vec![status];
    if let Some(since) = since_line(policy) {
        lines.push(since);
    }
    if let Some(alt) = &policy.alternative {
        lines.push(format!("Alternative: {alt}"));
    }
    if let Some(reason) = &policy.reason {
        lines.push(format!("Reason: {reason}"));
    }

    let banner = frame(&lines);
    RenderedMessage {
        runtime: banner.clone(),
        help: banner,
        listing_tag: listing_tag(lifecycle.state),
        severity: severity(lifecycle.state),
    }
}

/// Error block shown when execution is vetoed.
pub fn render_removed(err: &CommandRemovedError) -> String {
    let mut lines = vec![format!(
        "Command REMOVED on: {} ({} days ago)",
        err.removal_date, err.days_ago
    )];
    if let Some(alt) = &err.alternative {
        lines.push(format!("Use instead: {alt}"));
    }
    frame(&lines)
}

fn since_line(policy: &DeprecationPolicy) -> Option<String> {
    match (policy.deprecated_date, policy.version.as_deref()) {
        (Some(d), Some(v)) => Some(format!("Deprecated since: {d} (version {v})")),
        (Some(d), None) => Some(format!("Deprecated since: {d}")),
        (None, Some(v)) => Some(format!("Deprecated since: version {v}")),
        (None, None) => None,
    }
}

fn frame(lines: &[String]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    for l in lines {
        out.push_str(l);
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

/// Turns a severity into terminal styling. The engine only ever hands over
/// plain text plus a severity.
pub trait Paint {
    fn paint(&self, text: &str, severity: Severity) -> String;
}

pub struct PlainPaint;

impl Paint for PlainPaint {
    fn paint(&self, text: &str, _severity: Severity) -> String {
        text.to_string()
    }
}

/// Styles through `colored`; honors its global override (`--no-color`, `NO_COLOR`).
pub struct AnsiPaint;

impl Paint for AnsiPaint {
    fn paint(&self, text: &str, severity: Severity) -> String {
        text.lines()
            .map(|l| match severity {
                Severity::Notice => l.yellow().to_string(),
                Severity::Urgent => l.red().bold().to_string(),
            })
            .map(|l| l + "\n")
            .collect()
    }
}
