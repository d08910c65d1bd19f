//! src/ui/node.rs
//!
//! Recursive layout Node + Panel trait used across the UI.
//!
//! The tree is rebuilt every frame. Fixed splits use plain ratatui
//! constraints; resizable splits take their sizes from a `PanelGroup` in the
//! workspace and draw a one-cell handle between adjacent panels.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::layout::{GroupKey, HandleId, Workspace};

/// Panel trait: any renderable surface implements this.
pub trait Panel {
    fn draw(&self, f: &mut Frame<'_>, area: Rect);
}

/// One child of a resizable group.
pub struct Slot {
    pub id: String,
    pub default_size: f64,
    pub node: Node,
}

/// Node tree used to compose the UI each frame.
pub enum Node {
    Group {
        direction: Direction,
        constraints: Vec<Constraint>,
        children: Vec<Node>,
    },
    Resizable {
        group: GroupKey,
        children: Vec<Slot>,
    },
    Leaf {
        panel: Box<dyn Panel>,
    },
}

impl Node {
    /// Register and unregister panels so every resizable group matches the
    /// slots this tree renders.
    pub fn mount(&self, ws: &mut Workspace) {
        match self {
            Node::Group { children, .. } => {
                for child in children {
                    child.mount(ws);
                }
            }
            Node::Resizable { group, children } => {
                let panels: Vec<(&str, f64)> = children
                    .iter()
                    .map(|s| (s.id.as_str(), s.default_size))
                    .collect();
                ws.group_mut(*group).sync_panels(&panels);
                for slot in children {
                    slot.node.mount(ws);
                }
            }
            Node::Leaf { .. } => {}
        }
    }

    /// Draw the node into the given area.
    pub fn draw(&self, f: &mut Frame<'_>, area: Rect, ws: &mut Workspace) {
        match self {
            Node::Group {
                direction,
                constraints,
                children,
            } => {
                let chunks = Layout::default()
                    .direction(*direction)
                    .constraints(constraints.clone())
                    .split(area);
                for (child, chunk) in children.iter().zip(chunks.iter()) {
                    child.draw(f, *chunk, ws);
                }
            }
            Node::Resizable { group, children } => {
                draw_resizable(f, area, ws, *group, children);
            }
            Node::Leaf { panel } => {
                panel.draw(f, area);
            }
        }
    }
}

/// Lay panels out in group order: panel, handle, panel, ...
fn draw_resizable(
    f: &mut Frame<'_>,
    area: Rect,
    ws: &mut Workspace,
    key: GroupKey,
    children: &[Slot],
) {
    let group = ws.group_mut(key);
    group.set_bounds(area);
    let direction = group.direction();

    // group order decides placement, not slot order
    let placed: Vec<(&Slot, Constraint)> = group
        .order()
        .iter()
        .filter_map(|id| children.iter().find(|s| &s.id == id))
        .map(|s| {
            let constraint = if group.is_collapsed(&s.id) {
                Constraint::Length(0)
            } else {
                percent_constraint(group.size_or_default(&s.id, s.default_size))
            };
            (s, constraint)
        })
        .collect();
    let active: Vec<bool> = group.handles().iter().map(|h| h.is_active).collect();

    let mut constraints = Vec::with_capacity(placed.len() * 2);
    for (i, (_, constraint)) in placed.iter().enumerate() {
        if i > 0 {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(*constraint);
    }
    let chunks = Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area);

    for (i, (slot, _)) in placed.iter().enumerate() {
        if i > 0 {
            let handle_id = HandleId(i - 1);
            let drawn = chunks[2 * i - 1];
            ws.group_mut(key).record_handle_area(handle_id, drawn);
            draw_handle(f, drawn, direction, active.get(i - 1).copied().unwrap_or(false));
        }
        let area = chunks[2 * i];
        if !area.is_empty() {
            slot.node.draw(f, area, ws);
        }
    }
}

/// Percentage of the main axis as a ratio constraint (hundredths of a percent).
fn percent_constraint(size: f64) -> Constraint {
    let scaled = (size.max(0.0) * 100.0).round() as u32;
    Constraint::Ratio(scaled, 10_000)
}

fn draw_handle(f: &mut Frame<'_>, area: Rect, direction: Direction, active: bool) {
    let borders = match direction {
        Direction::Horizontal => Borders::LEFT,
        Direction::Vertical => Borders::TOP,
    };
    let style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    f.render_widget(Block::default().borders(borders).border_style(style), area);
}

/// Helper: create a fixed group node.
pub fn group(direction: Direction, constraints: Vec<Constraint>, children: Vec<Node>) -> Node {
    Node::Group {
        direction,
        constraints,
        children,
    }
}

/// Helper: create a resizable group node backed by `group` in the workspace.
pub fn resizable(group: GroupKey, children: Vec<Slot>) -> Node {
    Node::Resizable { group, children }
}

/// Helper: create a slot for a resizable group.
pub fn slot(id: &str, default_size: f64, node: Node) -> Slot {
    Slot {
        id: id.to_string(),
        default_size,
        node,
    }
}

/// Helper: create a leaf node.
pub fn leaf(panel: Box<dyn Panel>) -> Node {
    Node::Leaf { panel }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::layout::PanelGroup;

    struct Blank;

    impl Panel for Blank {
        fn draw(&self, _f: &mut Frame<'_>, _area: Rect) {}
    }

    fn blank() -> Node {
        leaf(Box::new(Blank))
    }

    fn render(tree: &Node, ws: &mut Workspace, width: u16, height: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        ws.begin_frame();
        tree.mount(ws);
        terminal.draw(|f| tree.draw(f, f.area(), ws)).unwrap();
        terminal
    }

    #[test]
    fn mount_registers_slots_in_order() {
        let mut ws = Workspace::new();
        let key = ws.add_group(PanelGroup::new("root", Direction::Horizontal));
        let tree = resizable(key, vec![slot("a", 30.0, blank()), slot("b", 70.0, blank())]);
        tree.mount(&mut ws);
        assert_eq!(ws.group(key).order(), ["a", "b"]);
        assert_eq!(ws.group(key).panel_size("b"), Some(70.0));
    }

    #[test]
    fn handles_are_drawn_between_panels() {
        let mut ws = Workspace::new();
        let key = ws.add_group(PanelGroup::new("root", Direction::Horizontal));
        let tree = resizable(
            key,
            vec![
                slot("a", 50.0, blank()),
                slot("b", 25.0, blank()),
                slot("c", 25.0, blank()),
            ],
        );
        let terminal = render(&tree, &mut ws, 41, 5);

        let g = ws.group(key);
        assert_eq!(g.bounds(), Some(Rect::new(0, 0, 41, 5)));

        // dividers are drawn with a vertical border glyph
        let buffer = terminal.backend().buffer();
        let dividers: Vec<u16> = (0..41u16)
            .filter(|x| buffer[(*x, 2)].symbol() == "│")
            .collect();
        assert_eq!(dividers.len(), 2);
        assert!(dividers[0] > 10 && dividers[0] < 30);
        assert_eq!(g.handle_at(dividers[0], 2), Some(HandleId(0)));
        assert_eq!(g.handle_at(dividers[1], 2), Some(HandleId(1)));
    }

    #[test]
    fn dropping_a_slot_unmounts_the_panel() {
        let mut ws = Workspace::new();
        let key = ws.add_group(PanelGroup::new("root", Direction::Vertical));
        let full = resizable(key, vec![slot("a", 50.0, blank()), slot("b", 50.0, blank())]);
        render(&full, &mut ws, 10, 20);
        assert_eq!(ws.group(key).handles().len(), 1);

        let partial = resizable(key, vec![slot("a", 50.0, blank())]);
        render(&partial, &mut ws, 10, 20);
        assert_eq!(ws.group(key).panel_size("b"), None);
        assert_eq!(ws.group(key).handle_at(5, 10), None);
    }

    #[test]
    fn collapsed_panel_draws_at_zero_cells() {
        let mut ws = Workspace::new();
        let key = ws.add_group(PanelGroup::new("root", Direction::Horizontal));
        let tree = resizable(
            key,
            vec![
                slot("a", 40.0, blank()),
                slot("b", 30.0, blank()),
                slot("c", 30.0, blank()),
            ],
        );
        tree.mount(&mut ws);
        ws.group_mut(key).toggle_collapse("a");
        let terminal = render(&tree, &mut ws, 41, 5);

        // the first divider sits on the left edge, right after the empty panel
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 2)].symbol(), "│");
        assert_eq!(ws.group(key).handle_at(0, 2), Some(HandleId(0)));
        assert_eq!(ws.group(key).panel_size("a"), Some(40.0));
    }

    #[test]
    fn nested_groups_share_one_workspace() {
        let mut ws = Workspace::new();
        let outer = ws.add_group(PanelGroup::new("outer", Direction::Horizontal));
        let inner = ws.add_group(PanelGroup::new("inner", Direction::Vertical));
        let tree = group(
            Direction::Vertical,
            vec![Constraint::Length(1), Constraint::Min(0)],
            vec![
                blank(),
                resizable(
                    outer,
                    vec![
                        slot("side", 30.0, blank()),
                        slot(
                            "main",
                            70.0,
                            resizable(inner, vec![slot("up", 50.0, blank()), slot("down", 50.0, blank())]),
                        ),
                    ],
                ),
            ],
        );
        render(&tree, &mut ws, 60, 21);

        assert_eq!(ws.group(outer).bounds().map(|r| r.y), Some(1));
        let inner_bounds = ws.group(inner).bounds().unwrap();
        assert!(inner_bounds.x > 0);
        assert_eq!(ws.group(inner).order(), ["up", "down"]);
    }
}
