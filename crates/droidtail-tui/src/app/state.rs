use chrono::NaiveTime;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use droidtail_types::{DeviceInfo, FilterConfig};

use super::{Action, FilterField};

/// Screen enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    DeviceSelect,
    LogViewer,
}

/// UI-specific transient state
pub struct UiState {
    /// List state for the device screen
    pub list_state: ListState,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// The active filter criteria, mutated only here on the UI task
    pub filter: FilterConfig,

    /// Which filter field is being typed into, if any
    pub input_active: Option<FilterField>,

    /// Text being typed for the active field
    pub input_buffer: String,

    /// Problem with the last applied input (bad time format, regex warning)
    pub input_error: Option<String>,

    /// Scroll position in the log viewer
    pub log_scroll: usize,

    /// Follow mode: keep the newest entries in view
    pub follow: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            list_state: ListState::default(),
            help_visible: false,
            error_message: None,
            filter: FilterConfig::default(),
            input_active: None,
            input_buffer: String::new(),
            input_error: None,
            log_scroll: 0,
            follow: true,
        }
    }
}

/// Global application state
pub struct AppState {
    /// Current screen being displayed
    pub current_screen: Screen,

    /// Enumerated devices (without the synthetic default row)
    pub devices: Vec<DeviceInfo>,

    /// Device the capture session targets
    pub selected_device: Option<DeviceInfo>,

    /// Is a capture session running?
    pub capturing: bool,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,

    /// Channel sender for actions
    pub action_tx: mpsc::UnboundedSender<Action>,

    /// Dirty flag for rendering - only render when true
    pub render_dirty: bool,
}

impl AppState {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let mut ui_state = UiState::default();
        ui_state.list_state.select(Some(0));

        Self {
            current_screen: Screen::DeviceSelect,
            devices: Vec::new(),
            selected_device: None,
            capturing: false,
            ui_state,
            should_quit: false,
            action_tx,
            render_dirty: true,
        }
    }

    /// Rows shown on the device screen: the default target first, then
    /// everything enumeration found.
    pub fn device_rows(&self) -> Vec<DeviceInfo> {
        let mut rows = vec![DeviceInfo::default_target()];
        rows.extend(self.devices.iter().cloned());
        rows
    }

    /// Move to the log viewer for the given device
    pub fn enter_log_viewer(&mut self, device: DeviceInfo) {
        self.selected_device = Some(device);
        self.current_screen = Screen::LogViewer;
        self.ui_state.log_scroll = 0;
        self.ui_state.follow = true;
    }

    /// Leave the log viewer. Returns false when already at the root screen.
    pub fn go_back(&mut self) -> bool {
        match self.current_screen {
            Screen::LogViewer => {
                self.current_screen = Screen::DeviceSelect;
                self.selected_device = None;
                self.ui_state.list_state.select(Some(0));
                true
            }
            Screen::DeviceSelect => false,
        }
    }

    /// Move selection up in the device list
    pub fn list_up(&mut self) {
        let len = self.device_rows().len();
        if len == 0 {
            return;
        }
        let i = match self.ui_state.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.ui_state.list_state.select(Some(i));
    }

    /// Move selection down in the device list
    pub fn list_down(&mut self) {
        let len = self.device_rows().len();
        if len == 0 {
            return;
        }
        let i = match self.ui_state.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.ui_state.list_state.select(Some(i));
    }

    /// Device row currently highlighted
    pub fn selected_row(&self) -> Option<DeviceInfo> {
        let rows = self.device_rows();
        self.ui_state
            .list_state
            .selected()
            .and_then(|i| rows.get(i).cloned())
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.error_message = Some(msg);
    }

    /// Dismiss the error message
    pub fn dismiss_error(&mut self) {
        self.ui_state.error_message = None;
    }

    /// Begin typing into a filter field, prefilled with its current value
    pub fn open_input(&mut self, field: FilterField) {
        self.ui_state.input_error = None;
        self.ui_state.input_buffer = match field {
            FilterField::Substring => self.ui_state.filter.substring.clone(),
            FilterField::Regex => self.ui_state.filter.regex_pattern.clone(),
            FilterField::TimeFrom => format_time(self.ui_state.filter.time_from),
            FilterField::TimeTo => format_time(self.ui_state.filter.time_to),
        };
        self.ui_state.input_active = Some(field);
    }

    /// Abandon the current input without touching the filter
    pub fn cancel_input(&mut self) {
        self.ui_state.input_active = None;
        self.ui_state.input_buffer.clear();
    }

    pub fn input_char(&mut self, c: char) {
        self.ui_state.input_buffer.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.ui_state.input_buffer.pop();
    }

    /// Commit the typed value into the filter config. Bad time formats are
    /// rejected and keep the input open; a non-compiling regex is accepted
    /// (the engine fails closed) but flagged so the bar can warn.
    pub fn apply_input(&mut self) {
        let Some(field) = self.ui_state.input_active else {
            return;
        };
        let text = self.ui_state.input_buffer.clone();
        self.ui_state.input_error = None;

        match field {
            FilterField::Substring => {
                self.ui_state.filter.substring = text;
            }
            FilterField::Regex => {
                if text.len() > 1 && regex::Regex::new(&text).is_err() {
                    self.ui_state.input_error =
                        Some("invalid regex: matches nothing".to_string());
                }
                self.ui_state.filter.regex_pattern = text;
            }
            FilterField::TimeFrom | FilterField::TimeTo => match parse_time(&text) {
                Some(t) => {
                    if field == FilterField::TimeFrom {
                        self.ui_state.filter.time_from = t;
                    } else {
                        self.ui_state.filter.time_to = t;
                    }
                    self.ui_state.filter.time_enabled = true;
                }
                None => {
                    self.ui_state.input_error =
                        Some(format!("expected H:MM:SS, got '{}'", text));
                    // Leave the input open so the value can be fixed
                    return;
                }
            },
        }

        self.ui_state.input_active = None;
        self.ui_state.input_buffer.clear();
    }

    /// Drop every refinement, keeping the severity flags and prefilter
    pub fn clear_filters(&mut self) {
        self.ui_state.filter.substring.clear();
        self.ui_state.filter.regex_pattern.clear();
        self.ui_state.filter.time_enabled = false;
        self.ui_state.input_error = None;
    }
}

fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        AppState::new(tx)
    }

    #[test]
    fn test_device_rows_start_with_default_target() {
        let mut s = state();
        s.devices = vec![DeviceInfo {
            id: "abc".into(),
            display_name: "flo".into(),
        }];
        let rows = s.device_rows();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].id.is_empty());
        assert_eq!(rows[1].id, "abc");
    }

    #[test]
    fn test_list_navigation_wraps() {
        let mut s = state();
        s.devices = vec![DeviceInfo {
            id: "abc".into(),
            display_name: "flo".into(),
        }];
        s.list_up();
        assert_eq!(s.ui_state.list_state.selected(), Some(1));
        s.list_down();
        assert_eq!(s.ui_state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_apply_substring_input() {
        let mut s = state();
        s.open_input(FilterField::Substring);
        for c in "Unity".chars() {
            s.input_char(c);
        }
        s.apply_input();
        assert_eq!(s.ui_state.filter.substring, "Unity");
        assert!(s.ui_state.input_active.is_none());
    }

    #[test]
    fn test_bad_time_input_keeps_field_open() {
        let mut s = state();
        s.open_input(FilterField::TimeFrom);
        s.ui_state.input_buffer = "not a time".to_string();
        s.apply_input();
        assert!(s.ui_state.input_error.is_some());
        assert_eq!(s.ui_state.input_active, Some(FilterField::TimeFrom));
        assert!(!s.ui_state.filter.time_enabled);
    }

    #[test]
    fn test_time_input_enables_window() {
        let mut s = state();
        s.open_input(FilterField::TimeTo);
        s.ui_state.input_buffer = "12:30:05".to_string();
        s.apply_input();
        assert!(s.ui_state.filter.time_enabled);
        assert_eq!(
            s.ui_state.filter.time_to,
            NaiveTime::from_hms_opt(12, 30, 5).unwrap()
        );
    }

    #[test]
    fn test_invalid_regex_is_accepted_with_warning() {
        let mut s = state();
        s.open_input(FilterField::Regex);
        s.ui_state.input_buffer = "(open".to_string();
        s.apply_input();
        assert_eq!(s.ui_state.filter.regex_pattern, "(open");
        assert!(s.ui_state.input_error.is_some());
        assert!(s.ui_state.input_active.is_none());
    }

    #[test]
    fn test_clear_filters_keeps_severity_flags() {
        let mut s = state();
        s.ui_state.filter.substring = "abc".into();
        s.ui_state.filter.time_enabled = true;
        s.ui_state.filter.show_debug = false;
        s.clear_filters();
        assert!(s.ui_state.filter.substring.is_empty());
        assert!(!s.ui_state.filter.time_enabled);
        assert!(!s.ui_state.filter.show_debug);
    }
}
