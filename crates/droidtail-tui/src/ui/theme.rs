use ratatui::style::{Color, Modifier, Style};

/// Color theme for the application
pub struct Theme;

impl Theme {
    // Base colors
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;

    // Accent colors
    pub const PRIMARY: Color = Color::Cyan;
    pub const HIGHLIGHT: Color = Color::Yellow;

    // Capture state
    pub const RUNNING: Color = Color::Green;
    pub const STOPPED: Color = Color::Red;

    // Border styles
    pub fn border() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    // Text styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn text_highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    // List styles
    pub fn list_item() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn list_item_selected() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    // Status bar styles
    pub fn status_bar() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    pub fn status_bar_key() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    // Filter chip styles: a criterion that is on vs off
    pub fn chip_on(color: Color) -> Style {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub fn chip_off() -> Style {
        Style::default()
            .fg(Self::FG_DIM)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::STOPPED).add_modifier(Modifier::BOLD)
    }
}
