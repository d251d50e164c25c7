//! Non-fatal diagnostics.
//!
//! Warnings accompany a valid (possibly degraded) result instead of
//! aborting generation. Context keys are sorted so formatted output is
//! deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A recoverable condition surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningItem {
    /// Stable machine-readable code, e.g. `empty_input`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Extra key/value context (offending index, counts, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl WarningItem {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Attach a context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }
}

impl std::fmt::Display for WarningItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if !self.context.is_empty() {
            let items: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            write!(f, " ({})", items.join(", "))?;
        }
        Ok(())
    }
}

/// One-line summary of an accumulated warning list: count plus the
/// distinct codes in first-seen order. Empty string when there are none.
pub fn warnings_summary(warnings: &[WarningItem]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut codes: Vec<&str> = Vec::new();
    for warning in warnings {
        if !codes.contains(&warning.code.as_str()) {
            codes.push(&warning.code);
        }
    }
    format!("{} warnings: {}", warnings.len(), codes.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_context() {
        let warning = WarningItem::new("empty_input", "path has fewer than 2 points");
        assert_eq!(
            warning.to_string(),
            "empty_input: path has fewer than 2 points"
        );
    }

    #[test]
    fn test_display_sorted_context() {
        let warning = WarningItem::new("nonfinite_points", "skipped invalid points")
            .with_context("skipped", 3)
            .with_context("first_index", 7);
        assert_eq!(
            warning.to_string(),
            "nonfinite_points: skipped invalid points (first_index=7, skipped=3)"
        );
    }

    #[test]
    fn test_summary_distinct_codes() {
        let warnings = vec![
            WarningItem::new("empty_input", "a"),
            WarningItem::new("degenerate_geometry", "b"),
            WarningItem::new("empty_input", "c"),
        ];
        assert_eq!(
            warnings_summary(&warnings),
            "3 warnings: empty_input, degenerate_geometry"
        );
        assert_eq!(warnings_summary(&[]), "");
    }
}
