//! src/panels/sizes.rs
//!
//! Live readout of every group's panel sizes, handles and drag state.

use ratatui::{
    Frame,
    layout::{Direction, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::layout::{HandleId, PanelGroup};

/// Copy of one group's state taken when the frame is built.
#[derive(Clone, Debug)]
pub struct GroupReport {
    pub name: String,
    pub direction: Direction,
    /// Extent of the main axis in cells, once drawn.
    pub cells: Option<u16>,
    pub sizes: Vec<(String, f64)>,
    pub collapsed: Vec<String>,
    pub total: f64,
    pub active: Option<HandleId>,
    pub focused: Option<HandleId>,
}

impl GroupReport {
    pub fn from_group(group: &PanelGroup, focused: Option<HandleId>) -> Self {
        Self {
            name: group.name().to_string(),
            direction: group.direction(),
            cells: group.bounds().map(|r| match group.direction() {
                Direction::Horizontal => r.width,
                Direction::Vertical => r.height,
            }),
            sizes: group
                .sizes()
                .into_iter()
                .map(|(id, size)| (id.to_string(), size))
                .collect(),
            collapsed: group
                .order()
                .iter()
                .filter(|id| group.is_collapsed(id))
                .cloned()
                .collect(),
            total: group.total_percent(),
            active: group.active_handle(),
            focused,
        }
    }
}

pub struct SizesPanel {
    pub reports: Vec<GroupReport>,
}

impl SizesPanel {
    pub fn new(reports: Vec<GroupReport>) -> Self {
        Self { reports }
    }

    /// Ten-cell bar for a percentage.
    fn bar(size: f64) -> String {
        let filled = ((size / 10.0).round() as usize).min(10);
        format!("{}{}", "█".repeat(filled), "·".repeat(10 - filled))
    }
}

impl crate::ui::Panel for SizesPanel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        for report in &self.reports {
            let axis = match report.direction {
                Direction::Horizontal => "horizontal",
                Direction::Vertical => "vertical",
            };
            lines.push(Line::from(vec![
                Span::styled(
                    report.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(match report.cells {
                    Some(cells) => format!(" ({axis}, {cells} cells)"),
                    None => format!(" ({axis})"),
                }),
            ]));
            for (id, size) in &report.sizes {
                let (bar_style, suffix) = if report.collapsed.contains(id) {
                    (Style::default().fg(Color::DarkGray), " collapsed")
                } else {
                    (Style::default().fg(Color::Green), "")
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {:<10}", id),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(Self::bar(*size), bar_style),
                    Span::raw(format!(" {:>6.2}%{suffix}", size)),
                ]));
            }

            // total drifts from 100 once a panel unmounts
            let total_style = if (report.total - 100.0).abs() > 0.01 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            lines.push(Line::from(Span::styled(
                format!(" total {:.2}%", report.total),
                total_style,
            )));

            if let Some(h) = report.active {
                lines.push(Line::from(Span::styled(
                    format!(" dragging {h}"),
                    Style::default().fg(Color::Yellow),
                )));
            } else if let Some(h) = report.focused {
                lines.push(Line::from(Span::raw(format!(" focus {h}"))));
            }
            lines.push(Line::default());
        }

        let block = Block::default().title("Layout").borders(Borders::ALL);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}
