use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::ui::Theme;

/// A bordered selection list with a primary and a dimmed secondary column
pub struct ListSelector<'a> {
    title: &'a str,
    rows: Vec<(String, String)>,
}

impl<'a> ListSelector<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            rows: Vec::new(),
        }
    }

    /// Rows as (primary, secondary) pairs; the secondary part renders dim
    pub fn rows<I, S, T>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        self.rows = rows
            .into_iter()
            .map(|(primary, secondary)| (primary.into(), secondary.into()))
            .collect();
        self
    }
}

impl StatefulWidget for ListSelector<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let items: Vec<ListItem> = self
            .rows
            .into_iter()
            .map(|(primary, secondary)| {
                let mut spans = vec![Span::styled(primary, Theme::list_item())];
                if !secondary.is_empty() {
                    spans.push(Span::styled(format!("  {}", secondary), Theme::text_dim()));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(self.title, Theme::title()));

        let list = List::new(items)
            .block(block)
            .highlight_style(Theme::list_item_selected())
            .highlight_symbol("▶ ");

        StatefulWidget::render(list, area, buf, state);
    }
}
