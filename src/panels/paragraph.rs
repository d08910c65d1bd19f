//! src/panels/paragraph.rs
//!
//! Wrapped text panel for help and key bindings. Lines of the form
//! `key  description` get the key highlighted.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub struct ParagraphPanel {
    pub lines: Vec<String>,
    pub title: String,
}

impl ParagraphPanel {
    pub fn new(title: &str, lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            title: title.to_string(),
        }
    }

    fn styled(line: &str) -> Line<'_> {
        match line.split_once("  ") {
            Some((key, rest)) if !key.trim().is_empty() => Line::from(vec![
                Span::styled(
                    key,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::raw(rest.trim_start()),
            ]),
            _ => Line::from(line),
        }
    }
}

impl crate::ui::Panel for ParagraphPanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let text: Vec<Line> = self.lines.iter().map(|l| Self::styled(l)).collect();
        let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(self.title.clone())
                .borders(Borders::ALL),
        );
        f.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_column_is_split_off() {
        let line = ParagraphPanel::styled("Tab  cycle handles");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[0].content, "Tab");
        assert_eq!(line.spans[2].content, "cycle handles");
    }

    #[test]
    fn plain_lines_stay_whole() {
        let line = ParagraphPanel::styled("drag a divider");
        assert_eq!(line.spans.len(), 1);
    }
}
