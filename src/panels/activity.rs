//! src/panels/activity.rs
//!
//! Activity panel: a sparkline of the demo series with a one-line stats row.
//!
//! Gives the resizable panels something that visibly reflows when their
//! width changes.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Sparkline},
};

use crate::feed::Series;

pub struct ActivityPanel {
    pub title: String,
    pub samples: Vec<u64>,
    pub ceiling: u64,
    pub range: (u64, u64),
    pub last: u64,
}

impl ActivityPanel {
    /// Snapshot a series for this frame.
    pub fn new(title: &str, series: &Series) -> Self {
        Self {
            title: title.to_string(),
            samples: series.as_slice().to_vec(),
            ceiling: series.ceiling(),
            range: series.range(),
            last: series.last(),
        }
    }

    /// The newest samples that fit in `width` cells.
    fn visible(&self, width: u16) -> &[u64] {
        let start = self.samples.len().saturating_sub(width as usize);
        &self.samples[start..]
    }
}

impl crate::ui::Panel for ActivityPanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .title(self.title.clone())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let stats = format!(
            "min {}  max {}  last {}",
            self.range.0, self.range.1, self.last
        );
        f.render_widget(
            Paragraph::new(stats).style(Style::default().fg(Color::DarkGray)),
            chunks[0],
        );

        let spark = Sparkline::default()
            .data(self.visible(chunks[1].width))
            .max(self.ceiling)
            .style(Style::default().fg(Color::Magenta));
        f.render_widget(spark, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_keeps_newest_samples() {
        let mut series = Series::new(5, 100);
        for v in [1, 2, 3, 4, 5] {
            series.push(v);
        }
        let panel = ActivityPanel::new("t", &series);
        assert_eq!(panel.visible(3), &[3, 4, 5]);
        assert_eq!(panel.visible(10), &[1, 2, 3, 4, 5]);
    }
}
