//! src/layout/handle.rs
//!
//! Draggable dividers between adjacent panels.
//!
//! Handles are kept as an explicit sequence parallel to the panel order. Each
//! one names its two neighbours directly, and the whole sequence is rebuilt
//! whenever the order changes, so a handle never has to guess its pair from a
//! naming convention.

use std::fmt;

use ratatui::layout::{Direction, Rect};

/// Position of a handle in the handle sequence: handle `i` sits between
/// `order[i]` and `order[i + 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub usize);

impl HandleId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle-{}", self.0)
    }
}

/// A divider between two adjacent panels.
#[derive(Clone, Debug, PartialEq)]
pub struct Handle {
    pub id: HandleId,
    /// Panel before the handle along the main axis.
    pub prev: String,
    /// Panel after the handle along the main axis.
    pub next: String,
    /// True only while the pointer button that grabbed this handle is held.
    pub is_active: bool,
}

/// Rebuild the handle sequence for `order`.
///
/// Local `is_active` flags carry over by position so a re-layout in the middle
/// of a drag does not drop the visual feedback.
pub fn rebuild(order: &[String], previous: &[Handle]) -> Vec<Handle> {
    order
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Handle {
            id: HandleId(i),
            prev: pair[0].clone(),
            next: pair[1].clone(),
            is_active: previous.get(i).is_some_and(|h| h.is_active),
        })
        .collect()
}

/// Extra cells on each side of the visual divider that still count as a hit.
pub const HIT_SLOP: u16 = 1;

/// Widen a handle's drawn rect along the main axis, clipped to `bounds`.
///
/// The drawn footprint stays one cell; only the pointer target grows.
pub fn hit_area(direction: Direction, drawn: Rect, bounds: Rect) -> Rect {
    let widened = match direction {
        Direction::Horizontal => {
            let x = drawn.x.saturating_sub(HIT_SLOP);
            Rect {
                x,
                width: drawn.right().saturating_add(HIT_SLOP) - x,
                ..drawn
            }
        }
        Direction::Vertical => {
            let y = drawn.y.saturating_sub(HIT_SLOP);
            Rect {
                y,
                height: drawn.bottom().saturating_add(HIT_SLOP) - y,
                ..drawn
            }
        }
    };
    widened.intersection(bounds)
}

/// Point-in-rect test in terminal cell coordinates.
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rebuild_pairs_adjacent_panels() {
        let handles = rebuild(&ids(&["a", "b", "c"]), &[]);
        assert_eq!(handles.len(), 2);
        assert_eq!(handles[0].id, HandleId(0));
        assert_eq!((handles[0].prev.as_str(), handles[0].next.as_str()), ("a", "b"));
        assert_eq!((handles[1].prev.as_str(), handles[1].next.as_str()), ("b", "c"));
    }

    #[test]
    fn rebuild_of_single_panel_has_no_handles() {
        assert!(rebuild(&ids(&["only"]), &[]).is_empty());
        assert!(rebuild(&[], &[]).is_empty());
    }

    #[test]
    fn rebuild_keeps_active_flag_by_position() {
        let mut before = rebuild(&ids(&["a", "b", "c"]), &[]);
        before[1].is_active = true;
        let after = rebuild(&ids(&["a", "c", "d"]), &before);
        assert!(!after[0].is_active);
        assert!(after[1].is_active);
        assert_eq!(after[1].prev, "c");
    }

    #[test]
    fn hit_area_widens_along_main_axis_only() {
        let bounds = Rect::new(0, 0, 40, 10);
        let drawn = Rect::new(10, 0, 1, 10);
        let hit = hit_area(Direction::Horizontal, drawn, bounds);
        assert_eq!(hit, Rect::new(9, 0, 3, 10));

        let drawn = Rect::new(0, 4, 40, 1);
        let hit = hit_area(Direction::Vertical, drawn, bounds);
        assert_eq!(hit, Rect::new(0, 3, 40, 3));
    }

    #[test]
    fn hit_area_is_clipped_to_group_bounds() {
        let bounds = Rect::new(5, 0, 10, 4);
        let drawn = Rect::new(5, 0, 1, 4);
        assert_eq!(
            hit_area(Direction::Horizontal, drawn, bounds),
            Rect::new(5, 0, 2, 4)
        );
    }

    #[test]
    fn contains_is_half_open() {
        let area = Rect::new(2, 2, 3, 1);
        assert!(contains(area, 2, 2));
        assert!(contains(area, 4, 2));
        assert!(!contains(area, 5, 2));
        assert!(!contains(area, 2, 3));
    }

    #[test]
    fn display_matches_handle_naming() {
        assert_eq!(HandleId(3).to_string(), "handle-3");
    }
}
