use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Header, content, status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Header, filter bar, content, status bar (log viewer)
    pub fn with_filter_bar(area: Rect) -> (Rect, Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2], chunks[3])
    }

    /// Horizontally centered content area for selection screens
    pub fn centered_list(area: Rect, width_percent: u16) -> Rect {
        let side = (100 - width_percent) / 2;
        let horizontal = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(side),
                Constraint::Percentage(width_percent),
                Constraint::Percentage(side),
            ])
            .split(area);

        horizontal[1]
    }
}
