use chrono::NaiveTime;
use regex::Regex;
use std::collections::HashSet;

use droidtail_types::{FilterConfig, LogEntry, Severity};

/// Stateless filter evaluation over a snapshot of entries
pub struct FilterEngine;

impl FilterEngine {
    /// Produce the ordered subsequence of `entries` satisfying every
    /// enabled criterion in `config`. Pure; safe to call repeatedly with
    /// different configs over the same snapshot.
    pub fn apply(config: &FilterConfig, entries: &[LogEntry]) -> Vec<LogEntry> {
        let filter = CompiledFilter::compile(config);
        entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect()
    }
}

/// Regex criterion state. A pattern the user has typed but that does not
/// parse excludes everything instead of surfacing an error.
enum RegexState {
    Disabled,
    Valid(Regex),
    Invalid,
}

/// A filter configuration compiled for one pass over the entries
pub struct CompiledFilter {
    /// Lowercased needle; None when the criterion is disabled
    substring: Option<String>,

    regex: RegexState,

    /// Literal marker restricting entries to Unity runtime output
    unity_only: bool,

    /// Exclusive time-of-day window; None when disabled
    time_window: Option<(NaiveTime, NaiveTime)>,

    /// Severities whose flag is enabled. Empty means nothing passes;
    /// this criterion is never vacuous.
    severities: HashSet<Severity>,
}

/// Marker substring identifying Unity runtime lines
const UNITY_MARKER: &str = "Unity";

/// Criteria strings of a single character are treated as not-yet-typed
const MIN_PATTERN_LEN: usize = 2;

impl CompiledFilter {
    pub fn compile(config: &FilterConfig) -> Self {
        let substring = (config.substring.len() >= MIN_PATTERN_LEN)
            .then(|| config.substring.to_lowercase());

        let regex = if config.regex_pattern.len() < MIN_PATTERN_LEN {
            RegexState::Disabled
        } else {
            match Regex::new(&config.regex_pattern) {
                Ok(re) => RegexState::Valid(re),
                Err(err) => {
                    tracing::debug!(pattern = %config.regex_pattern, %err, "invalid regex, failing closed");
                    RegexState::Invalid
                }
            }
        };

        let severities = Severity::ALL
            .into_iter()
            .filter(|s| config.severity_enabled(*s))
            .collect();

        Self {
            substring,
            regex,
            unity_only: config.unity_only,
            time_window: config.time_enabled.then_some((config.time_from, config.time_to)),
            severities,
        }
    }

    /// An entry is included only if every enabled criterion passes.
    /// Disabled criteria are vacuously true.
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(needle) = &self.substring {
            if !entry.message.to_lowercase().contains(needle) {
                return false;
            }
        }

        match &self.regex {
            RegexState::Disabled => {}
            RegexState::Valid(re) => {
                if !re.is_match(&entry.message) {
                    return false;
                }
            }
            RegexState::Invalid => return false,
        }

        if self.unity_only && !entry.message.contains(UNITY_MARKER) {
            return false;
        }

        if let Some((from, to)) = self.time_window {
            let t = entry.time_of_day();
            // Exclusive both ends; an inverted window matches nothing
            if t <= from || t >= to {
                return false;
            }
        }

        self.severities.contains(&entry.severity)
    }

    /// Whether the compiled regex criterion rejected its pattern
    pub fn regex_invalid(&self) -> bool {
        matches!(self.regex, RegexState::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn entry(raw: &str) -> LogEntry {
        LogEntry::parse(raw).unwrap()
    }

    // Pin the capture time so time-window tests are deterministic
    fn entry_at(raw: &str, time: NaiveTime) -> LogEntry {
        let mut e = entry(raw);
        e.timestamp = e.timestamp.with_time(time).unwrap();
        e
    }

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn open_config() -> FilterConfig {
        FilterConfig {
            unity_only: false,
            ..FilterConfig::default()
        }
    }

    #[test]
    fn test_severity_set_alone() {
        let entries = vec![
            entry("E/a: one"),
            entry("W/b: two"),
            entry("I/c: three"),
            entry("D/d: four"),
        ];

        let mut config = open_config();
        config.show_warning = false;
        config.show_debug = false;
        config.show_info = false;
        config.show_verbose = false;

        let out = FilterEngine::apply(&config, &entries);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Error);
    }

    #[test]
    fn test_all_flags_off_excludes_everything() {
        let entries = vec![entry("E/a: one"), entry("V/b: two")];
        let config = FilterConfig {
            unity_only: false,
            show_error: false,
            show_warning: false,
            show_debug: false,
            show_info: false,
            show_verbose: false,
            ..FilterConfig::default()
        };
        assert!(FilterEngine::apply(&config, &entries).is_empty());
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        let entries = vec![entry("I/a: Connection LOST"), entry("I/b: all good")];
        let mut config = open_config();
        config.substring = "lost".to_string();

        let out = FilterEngine::apply(&config, &entries);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("LOST"));
    }

    #[test]
    fn test_single_char_patterns_are_disabled() {
        let entries = vec![entry("I/a: zzz")];
        let mut config = open_config();
        config.substring = "q".to_string();
        config.regex_pattern = "(".to_string();
        // One-character patterns are not yet active, even an invalid one
        assert_eq!(FilterEngine::apply(&config, &entries).len(), 1);
    }

    #[test]
    fn test_regex_matches_anywhere() {
        let entries = vec![entry("I/a: retry attempt 3"), entry("I/b: steady")];
        let mut config = open_config();
        config.regex_pattern = r"attempt \d+".to_string();

        let out = FilterEngine::apply(&config, &entries);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_invalid_regex_fails_closed() {
        let entries = vec![entry("E/a: one"), entry("I/b: two")];
        let mut config = open_config();
        config.regex_pattern = "(unbalanced".to_string();

        assert!(FilterEngine::apply(&config, &entries).is_empty());
        assert!(CompiledFilter::compile(&config).regex_invalid());
    }

    #[test]
    fn test_unity_prefilter() {
        let entries = vec![entry("I/Unity : scene loaded"), entry("I/kernel: boot")];
        let mut config = open_config();
        config.unity_only = true;

        let out = FilterEngine::apply(&config, &entries);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("Unity"));
    }

    #[test]
    fn test_time_window_is_exclusive() {
        let e = entry_at("I/a: timed", t(12, 30, 0));
        let mut config = open_config();
        config.time_enabled = true;

        // Strictly inside passes
        config.time_from = t(12, 29, 55);
        config.time_to = t(12, 30, 5);
        assert_eq!(FilterEngine::apply(&config, std::slice::from_ref(&e)).len(), 1);

        // Boundary is excluded
        config.time_from = t(12, 30, 0);
        assert!(FilterEngine::apply(&config, std::slice::from_ref(&e)).is_empty());
    }

    #[test]
    fn test_inverted_time_window_matches_nothing() {
        let e = entry_at("I/a: timed", t(12, 30, 0));
        let mut config = open_config();
        config.time_enabled = true;
        config.time_from = t(12, 30, 10);
        config.time_to = t(12, 29, 50);
        assert!(FilterEngine::apply(&config, &[e]).is_empty());
    }

    #[test]
    fn test_conjunction_of_criteria() {
        let entries = vec![
            entry("E/Unity : shader error"),
            entry("E/kernel: io error"),
            entry("I/Unity : shader compiled"),
        ];
        let mut config = open_config();
        config.unity_only = true;
        config.substring = "shader".to_string();
        config.show_info = false;

        // All three criteria must hold at once
        let out = FilterEngine::apply(&config, &entries);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Error);
    }

    #[test]
    fn test_output_preserves_order() {
        let entries: Vec<LogEntry> =
            (0..5).map(|i| entry(&format!("I/a: line {}", i))).collect();
        let out = FilterEngine::apply(&open_config(), &entries);
        let payloads: Vec<&str> = out
            .iter()
            .map(|e| e.message.split_once(" | ").unwrap().1)
            .collect();
        assert_eq!(
            payloads,
            vec!["a: line 0", "a: line 1", "a: line 2", "a: line 3", "a: line 4"]
        );
    }

    #[test]
    fn test_end_to_end_eviction_then_filter() {
        use crate::buffer::{DRAIN_INTERVAL, LogBuffer};
        use std::time::Instant;

        let buffer = LogBuffer::new(3);
        for raw in ["E/a: one", "W/b: two", "I/c: three", "D/d: four"] {
            buffer.ingest(raw);
        }
        assert!(buffer.should_advance(Instant::now() + DRAIN_INTERVAL));

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].severity, Severity::Warning);
        assert_eq!(snapshot[1].severity, Severity::Info);
        assert_eq!(snapshot[2].severity, Severity::Debug);

        // The only Error entry was evicted, so an error-only view is empty
        let config = FilterConfig {
            unity_only: false,
            show_warning: false,
            show_debug: false,
            show_info: false,
            show_verbose: false,
            ..FilterConfig::default()
        };
        assert!(FilterEngine::apply(&config, &snapshot).is_empty());

        // Substring "two" keeps exactly the warning entry
        let mut config = FilterConfig {
            unity_only: false,
            ..FilterConfig::default()
        };
        config.substring = "two".to_string();
        let out = FilterEngine::apply(&config, &snapshot);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Warning);
    }
}
