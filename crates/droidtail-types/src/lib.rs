//! Shared types for droidtail
//!
//! This crate contains data structures used across multiple droidtail crates.

use chrono::{DateTime, Local, NaiveTime};
use ratatui::style::Color;

// ============================================================================
// Log Types
// ============================================================================

/// Log severity, derived from the one-character logcat tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Debug,
    Info,
    Verbose,
}

impl Severity {
    /// Map a logcat tag character to a severity.
    /// Unrecognized tags are treated as Verbose rather than rejected.
    pub fn from_tag(tag: char) -> Self {
        match tag {
            'E' => Self::Error,
            'W' => Self::Warning,
            'D' => Self::Debug,
            'I' => Self::Info,
            _ => Self::Verbose,
        }
    }

    /// The logcat tag character for this severity
    pub fn tag(&self) -> char {
        match self {
            Self::Error => 'E',
            Self::Warning => 'W',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Verbose => 'V',
        }
    }

    /// Get display color for this severity
    pub fn color(&self) -> Color {
        match self {
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
            Self::Debug => Color::Blue,
            Self::Info => Color::Green,
            Self::Verbose => Color::Gray,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Debug => "Debug",
            Self::Info => "Info",
            Self::Verbose => "Verbose",
        }
    }

    /// All severities in display order
    pub const ALL: [Severity; 5] = [
        Severity::Error,
        Severity::Warning,
        Severity::Debug,
        Severity::Info,
        Severity::Verbose,
    ];
}

/// A single captured log line. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct LogEntry {
    /// Severity parsed from the line's tag character
    pub severity: Severity,

    /// Wall-clock instant at which the line was ingested.
    /// Logcat's own timestamps are not parsed.
    pub timestamp: DateTime<Local>,

    /// Display text: capture time followed by the payload after the
    /// 2-character tag prefix, e.g. `9:41:07 | Unity : ready`
    pub message: String,
}

impl LogEntry {
    /// Parse a raw logcat line. Lines of 2 bytes or fewer carry no payload
    /// and yield `None`; they are dropped by the caller, not treated as
    /// errors.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() <= 2 {
            return None;
        }

        let tag = raw.chars().next()?;
        // Skip the tag character and the separator that follows it.
        let payload = raw.get(2..).unwrap_or("");
        let now = Local::now();

        Some(Self {
            severity: Severity::from_tag(tag),
            message: format!("{} | {}", now.format("%-H:%M:%S"), payload),
            timestamp: now,
        })
    }

    /// Time-of-day component of the capture timestamp
    pub fn time_of_day(&self) -> NaiveTime {
        self.timestamp.time()
    }
}

// ============================================================================
// Filter Configuration
// ============================================================================

/// Active filter criteria. Owned and mutated by the UI layer; the filter
/// engine only ever reads it.
#[derive(Clone, Debug)]
pub struct FilterConfig {
    /// Restrict entries to those mentioning the Unity runtime tag
    pub unity_only: bool,

    pub show_error: bool,
    pub show_warning: bool,
    pub show_debug: bool,
    pub show_info: bool,
    pub show_verbose: bool,

    /// Case-insensitive containment filter; active when longer than one char
    pub substring: String,

    /// Regex filter; active when longer than one char. An invalid pattern
    /// excludes everything rather than raising an error.
    pub regex_pattern: String,

    /// Time-of-day window, exclusive at both ends
    pub time_enabled: bool,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
}

impl FilterConfig {
    /// Whether the given severity's flag is enabled
    pub fn severity_enabled(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error => self.show_error,
            Severity::Warning => self.show_warning,
            Severity::Debug => self.show_debug,
            Severity::Info => self.show_info,
            Severity::Verbose => self.show_verbose,
        }
    }

    /// Flip the flag for the given severity
    pub fn toggle_severity(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.show_error = !self.show_error,
            Severity::Warning => self.show_warning = !self.show_warning,
            Severity::Debug => self.show_debug = !self.show_debug,
            Severity::Info => self.show_info = !self.show_info,
            Severity::Verbose => self.show_verbose = !self.show_verbose,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        let now = Local::now().time();
        Self {
            unity_only: true,
            show_error: true,
            show_warning: true,
            show_debug: true,
            show_info: true,
            show_verbose: true,
            substring: String::new(),
            regex_pattern: String::new(),
            time_enabled: false,
            time_from: now,
            time_to: now,
        }
    }
}

// ============================================================================
// Device Types
// ============================================================================

/// One device from `adb devices -l` output
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Serial passed to `adb -s`; empty string means the default device
    pub id: String,

    /// Human-readable name, taken from the trailing `model:`/`device:` field
    pub display_name: String,
}

impl DeviceInfo {
    /// Parse one line of `adb devices -l` output, e.g.
    /// `0a388e93  device usb:1-1 product:razor model:Nexus_7 device:flo`
    /// Returns `None` for the header line and anything without an id field.
    pub fn parse(line: &str) -> Option<Self> {
        let id = line.split_whitespace().next()?;
        if id.is_empty() || id == "List" {
            return None;
        }

        let display_name = line
            .rfind(':')
            .map(|pos| line[pos + 1..].trim().to_string())
            .unwrap_or_default();

        Some(Self {
            id: id.to_string(),
            display_name,
        })
    }

    /// Placeholder for "no specific device" (adb picks the default target)
    pub fn default_target() -> Self {
        Self {
            id: String::new(),
            display_name: "default device".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_tag() {
        assert_eq!(Severity::from_tag('E'), Severity::Error);
        assert_eq!(Severity::from_tag('W'), Severity::Warning);
        assert_eq!(Severity::from_tag('D'), Severity::Debug);
        assert_eq!(Severity::from_tag('I'), Severity::Info);
        assert_eq!(Severity::from_tag('V'), Severity::Verbose);
    }

    #[test]
    fn test_unknown_tag_defaults_to_verbose() {
        assert_eq!(Severity::from_tag('X'), Severity::Verbose);
        assert_eq!(Severity::from_tag('7'), Severity::Verbose);

        let entry = LogEntry::parse("X/foo: bar").unwrap();
        assert_eq!(entry.severity, Severity::Verbose);
    }

    #[test]
    fn test_parse_strips_tag_prefix() {
        let entry = LogEntry::parse("E/crash: boom").unwrap();
        assert_eq!(entry.severity, Severity::Error);
        assert!(entry.message.ends_with(" | crash: boom"));
        assert!(entry.message.contains(" | "));
    }

    #[test]
    fn test_short_lines_are_dropped() {
        assert!(LogEntry::parse("").is_none());
        assert!(LogEntry::parse("E").is_none());
        assert!(LogEntry::parse("E/").is_none());
        assert!(LogEntry::parse("E/x").is_some());
    }

    #[test]
    fn test_filter_config_severity_flags() {
        let mut config = FilterConfig::default();
        assert!(config.severity_enabled(Severity::Error));

        config.toggle_severity(Severity::Error);
        assert!(!config.severity_enabled(Severity::Error));
        assert!(config.severity_enabled(Severity::Warning));
    }

    #[test]
    fn test_device_parse() {
        let device =
            DeviceInfo::parse("0a388e93  device usb:1-1 product:razor model:Nexus_7 device:flo")
                .unwrap();
        assert_eq!(device.id, "0a388e93");
        assert_eq!(device.display_name, "flo");
    }

    #[test]
    fn test_device_parse_skips_header() {
        assert!(DeviceInfo::parse("List of devices attached").is_none());
        assert!(DeviceInfo::parse("   ").is_none());
    }
}
