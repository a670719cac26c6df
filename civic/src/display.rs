//! Terminal formatting helpers for the CLI views.

use crate::types::{Priority, Status};
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};

/// Relative age of `then` as seen from `now`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

/// e.g. "Jan 15, 2025, 10:30 AM"
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

pub fn status_badge(status: Status) -> ColoredString {
    let label = status.label();
    match status {
        Status::Reported => label.white(),
        Status::InProgress => label.blue(),
        Status::Resolved => label.green(),
        Status::Closed => label.dimmed(),
    }
}

pub fn priority_badge(priority: Priority) -> ColoredString {
    let label = priority.label();
    match priority {
        Priority::Low => label.blue(),
        Priority::Medium => label.yellow(),
        Priority::High => label.bright_red(),
        Priority::Urgent => label.red().bold(),
    }
}
