//! src/panels/title.rs
//!
//! Header panel: application name plus the current drag status.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub struct TitlePanel {
    pub title: String,
    /// e.g. "dragging root/handle-0"; `None` when idle.
    pub status: Option<String>,
}

impl TitlePanel {
    pub fn new(title: &str, status: Option<String>) -> Self {
        Self {
            title: title.to_string(),
            status,
        }
    }
}

impl crate::ui::Panel for TitlePanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans = vec![Span::raw(self.title.clone())];
        if let Some(status) = &self.status {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                status.clone(),
                Style::default().fg(Color::Yellow),
            ));
        }
        let p = Paragraph::new(Line::from(spans))
            .block(Block::default().title("splitdeck").borders(Borders::ALL));
        f.render_widget(p, area);
    }
}
