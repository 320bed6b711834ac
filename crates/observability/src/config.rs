//! Environment-driven logging configuration.
//!
//! - `RUST_LOG`: filter directives (default `info`)
//! - `BANKBOOK_LOG_FORMAT`: `json` (default), `pretty` or `compact`

use core::str::FromStr;

pub const FILTER_ENV: &str = "RUST_LOG";
pub const FORMAT_ENV: &str = "BANKBOOK_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub filter: String,
    pub format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process env in production).
    ///
    /// Unknown formats fall back to JSON; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let filter = lookup(FILTER_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let format = lookup(FORMAT_ENV)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        Self { filter, format }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ObservabilityConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, ObservabilityConfig::default());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn reads_filter_and_format() {
        let config = ObservabilityConfig::from_lookup(lookup_from(&[
            ("RUST_LOG", "bankbook_banking=debug"),
            ("BANKBOOK_LOG_FORMAT", " Pretty "),
        ]));
        assert_eq!(config.filter, "bankbook_banking=debug");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn unknown_format_falls_back_to_json() {
        let config =
            ObservabilityConfig::from_lookup(lookup_from(&[("BANKBOOK_LOG_FORMAT", "xml")]));
        assert_eq!(config.format, LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn blank_filter_counts_as_unset() {
        let config = ObservabilityConfig::from_lookup(lookup_from(&[("RUST_LOG", "  ")]));
        assert_eq!(config.filter, "info");
    }
}
