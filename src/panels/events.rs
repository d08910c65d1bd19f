//! src/panels/events.rs
//!
//! Event panel: the tail of the layout event log, newest entry highlighted.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::feed::EventLog;

pub struct EventsPanel {
    pub entries: Vec<(u64, String)>,
}

impl EventsPanel {
    pub fn new(log: &EventLog) -> Self {
        Self {
            entries: log
                .iter()
                .map(|(seq, msg)| (seq, msg.to_string()))
                .collect(),
        }
    }
}

impl crate::ui::Panel for EventsPanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let height = area.height.saturating_sub(2) as usize;
        let start = self.entries.len().saturating_sub(height);
        let last_index = self.entries.len().saturating_sub(1);

        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .skip(start)
            .map(|(i, (seq, msg))| {
                let style = if i == last_index {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Green)
                };
                Line::from(vec![
                    Span::styled(format!("{:>5} ", seq), Style::default().fg(Color::Yellow)),
                    Span::styled(msg.clone(), style),
                ])
            })
            .collect();

        let title = format!("Events ({})", self.entries.len());
        let block = Block::default().title(title).borders(Borders::ALL);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
