use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use droidtail_logs::{CompiledFilter, LogBuffer};
use droidtail_types::Severity;

use crate::{
    app::AppState,
    ui::{Layout, Theme, components::StatusBar},
};

/// Log viewer screen
pub struct LogViewerScreen;

impl LogViewerScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState, buffer: &LogBuffer) {
        let area = frame.area();
        let (header_area, filter_area, logs_area, status_area) = Layout::with_filter_bar(area);

        let snapshot = buffer.snapshot();
        let filter = CompiledFilter::compile(&state.ui_state.filter);
        let filtered: Vec<_> = snapshot.iter().filter(|e| filter.matches(e)).collect();

        Self::render_header(frame, header_area, state, buffer);
        Self::render_filter_bar(frame, filter_area, state);
        Self::render_logs(frame, logs_area, state, &filtered);
        Self::render_status_bar(frame, status_area, buffer, filtered.len());
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState, buffer: &LogBuffer) {
        let device = state
            .selected_device
            .as_ref()
            .map(|d| {
                if d.id.is_empty() {
                    d.display_name.clone()
                } else {
                    format!("{} ({})", d.display_name, d.id)
                }
            })
            .unwrap_or_else(|| "?".to_string());

        let capture = if state.capturing {
            Span::styled("● capturing", Theme::chip_on(Theme::RUNNING))
        } else {
            Span::styled("■ stopped", Theme::chip_on(Theme::STOPPED))
        };

        let title = Line::from(vec![
            Span::styled("droidtail", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(device, Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            capture,
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(
                format!("{}/{} entries", buffer.len(), buffer.capacity()),
                Theme::text(),
            ),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    /// The filter bar shows either the active text input, a pending error,
    /// or the criteria chips.
    fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let ui = &state.ui_state;

        let line = if let Some(field) = ui.input_active {
            Line::from(vec![
                Span::styled(format!(" {}: ", field.label()), Theme::text_highlight()),
                Span::styled(ui.input_buffer.clone(), Theme::text()),
                Span::styled("▌", Theme::text_highlight()),
            ])
        } else if let Some(err) = ui
            .error_message
            .as_deref()
            .or(ui.input_error.as_deref())
        {
            Line::from(Span::styled(format!(" {}", err), Theme::error()))
        } else {
            Self::chips_line(state)
        };

        let bar = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if ui.input_active.is_some() {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(" Filters ", Theme::text_dim())),
        );

        frame.render_widget(bar, area);
    }

    fn chips_line(state: &AppState) -> Line<'_> {
        let config = &state.ui_state.filter;
        let mut spans = vec![Span::raw(" ")];

        for severity in Severity::ALL {
            let style = if config.severity_enabled(severity) {
                Theme::chip_on(severity.color())
            } else {
                Theme::chip_off()
            };
            spans.push(Span::styled(severity.label(), style));
            spans.push(Span::raw(" "));
        }

        spans.push(Span::styled("│ ", Theme::text_dim()));
        let unity_style = if config.unity_only {
            Theme::chip_on(Theme::PRIMARY)
        } else {
            Theme::chip_off()
        };
        spans.push(Span::styled("Unity-only", unity_style));

        if config.substring.len() > 1 {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!("~\"{}\"", config.substring),
                Theme::text_highlight(),
            ));
        }
        if config.regex_pattern.len() > 1 {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!("re:/{}/", config.regex_pattern),
                Theme::text_highlight(),
            ));
        }
        if config.time_enabled {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!(
                    "{}–{}",
                    config.time_from.format("%H:%M:%S"),
                    config.time_to.format("%H:%M:%S")
                ),
                Theme::text_highlight(),
            ));
        }

        Line::from(spans)
    }

    fn render_logs(
        frame: &mut Frame,
        area: Rect,
        state: &mut AppState,
        filtered: &[&droidtail_types::LogEntry],
    ) {
        let inner_height = area.height.saturating_sub(2) as usize;
        let inner_width = area.width.saturating_sub(2) as usize;

        let max_scroll = filtered.len().saturating_sub(inner_height);
        if state.ui_state.follow {
            state.ui_state.log_scroll = max_scroll;
        } else {
            state.ui_state.log_scroll = state.ui_state.log_scroll.min(max_scroll);
        }
        let scroll = state.ui_state.log_scroll;

        let lines: Vec<Line> = filtered
            .iter()
            .skip(scroll)
            .take(inner_height)
            .map(|entry| {
                let text = truncate_to_width(&entry.message, inner_width);
                Line::from(Span::styled(
                    text.to_string(),
                    Theme::chip_on(entry.severity.color()),
                ))
            })
            .collect();

        let title = if state.ui_state.follow {
            " Logs (following) "
        } else {
            " Logs "
        };

        let logs = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(title, Theme::text_dim())),
        );

        frame.render_widget(logs, area);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, buffer: &LogBuffer, shown: usize) {
        let hints = vec![
            ("e/w/d/i/v", "severity"),
            ("u", "unity"),
            ("/", "substring"),
            ("r", "regex"),
            ("t", "time"),
            ("s", "stop/start"),
            ("c", "clear"),
            ("?", "help"),
        ];

        let staged = buffer.staged_len();
        let right = if staged > 0 {
            format!("{} shown / {} kept (+{} staged)", shown, buffer.len(), staged)
        } else {
            format!("{} shown / {} kept", shown, buffer.len())
        };

        let status = StatusBar::new().hints(hints).right(right);
        frame.render_widget(status, area);
    }
}

/// Truncate to a display width, keeping multi-byte content intact
fn truncate_to_width(text: &str, max_width: usize) -> &str {
    if text.width() <= max_width {
        return text;
    }
    let mut end = 0;
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        end = idx + ch.len_utf8();
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width_ascii() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello", 3), "hel");
    }

    #[test]
    fn test_truncate_to_width_multibyte() {
        // Box drawing characters are 3 bytes, width 1
        assert_eq!(truncate_to_width("──────", 3), "───");
        // Wide CJK characters occupy two columns
        assert_eq!(truncate_to_width("日本語", 4), "日本");
    }
}
