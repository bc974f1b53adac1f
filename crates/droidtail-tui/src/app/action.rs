use droidtail_types::Severity;

/// Which filter field a text input edits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterField {
    Substring,
    Regex,
    TimeFrom,
    TimeTo,
}

impl FilterField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::Regex => "regex",
            Self::TimeFrom => "time from",
            Self::TimeTo => "time to",
        }
    }
}

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug)]
pub enum Action {
    // Navigation
    GoBack,
    Quit,

    // Device selection
    ListUp,
    ListDown,
    ListSelect,
    RefreshDevices,
    SelectDevice(String),

    // Capture lifecycle
    ToggleCapture,
    ClearLogs,

    // Filter criteria
    ToggleSeverity(Severity),
    ToggleUnityOnly,
    ToggleTimeFilter,
    ClearFilters,

    // Filter text input
    OpenFilterInput(FilterField),
    CloseFilterInput,
    FilterInputChar(char),
    FilterInputBackspace,
    ApplyFilterInput,

    // Log viewer scrolling
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,
    ToggleFollow,

    // Overlays / errors
    ToggleHelp,
    ShowError(String),
    DismissError,

    // Render request
    Render,
}
