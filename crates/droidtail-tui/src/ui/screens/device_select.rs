use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        Layout, Theme,
        components::{ListSelector, StatusBar, list_nav_hints},
    },
};

/// Device selection screen
pub struct DeviceSelectScreen;

impl DeviceSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        Self::render_header(frame, header_area);
        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled("droidtail", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Select Device", Theme::text()),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 70);

        let rows: Vec<(String, String)> = state
            .device_rows()
            .into_iter()
            .map(|device| {
                if device.id.is_empty() {
                    (device.display_name, String::new())
                } else {
                    (device.display_name, format!("({})", device.id))
                }
            })
            .collect();

        let selector = ListSelector::new(" Devices ").rows(rows);
        frame.render_stateful_widget(selector, list_area, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let right = format!("{} devices", state.devices.len());
        let status = StatusBar::new().hints(list_nav_hints()).right(right);
        frame.render_widget(status, area);
    }
}
