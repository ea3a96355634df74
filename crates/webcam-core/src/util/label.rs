//! Capture labels

use chrono::{DateTime, Utc};

/// Prefix for generated labels
pub const LABEL_PREFIX: &str = "notes";

/// Label for a capture taken at `now`: `notes-YYYY-MM-DDTHH-MM-SS` (UTC)
pub fn timestamp_label(now: DateTime<Utc>) -> String {
    format!("{LABEL_PREFIX}-{}", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// The user's label if non-empty, else a timestamp label for the current time
pub fn label_or_timestamp(label: Option<&str>) -> String {
    label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| timestamp_label(Utc::now()))
}
