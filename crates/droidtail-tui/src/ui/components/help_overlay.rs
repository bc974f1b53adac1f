use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let area = frame.area();

        let popup_width = 46.min(area.width.saturating_sub(4));
        let popup_height = 22.min(area.height.saturating_sub(4));

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Filters", Style::default().fg(Color::Yellow))),
            Self::key_line("e/w/d/i/v", "Toggle severity"),
            Self::key_line("u", "Unity logs only (restarts capture)"),
            Self::key_line("/", "Substring filter"),
            Self::key_line("r", "Regex filter"),
            Self::key_line("t", "Toggle time window"),
            Self::key_line("[ / ]", "Edit time from / to"),
            Self::key_line("n", "Clear filters"),
            Line::from(""),
            Line::from(Span::styled("Capture", Style::default().fg(Color::Yellow))),
            Self::key_line("s", "Stop/start capture"),
            Self::key_line("c", "Clear logs"),
            Line::from(""),
            Line::from(Span::styled("View", Style::default().fg(Color::Yellow))),
            Self::key_line("j/k", "Scroll"),
            Self::key_line("g/G", "Top / bottom"),
            Self::key_line("f", "Follow newest"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("Esc", "Back"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>10}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
