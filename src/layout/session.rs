//! src/layout/session.rs
//!
//! Host-wide effects of a drag session.
//!
//! While a handle is being dragged the pointer is forced to a resize cursor
//! matching the group's axis. The host decides how that is shown; the layout
//! code only says when a session begins and ends.

use std::io;

use ratatui::layout::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeCursor {
    /// Horizontal groups: panels side by side, divider moves left/right.
    Column,
    /// Vertical groups: panels stacked, divider moves up/down.
    Row,
}

impl ResizeCursor {
    pub fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Horizontal => ResizeCursor::Column,
            Direction::Vertical => ResizeCursor::Row,
        }
    }

    /// CSS cursor name, as understood by terminals implementing OSC 22.
    pub fn shape_name(self) -> &'static str {
        match self {
            ResizeCursor::Column => "col-resize",
            ResizeCursor::Row => "row-resize",
        }
    }
}

/// Host side of a drag session.
pub trait DragEffects {
    fn begin_drag(&mut self, cursor: ResizeCursor) -> io::Result<()>;

    /// Undo everything `begin_drag` did. Called on every session end.
    fn end_drag(&mut self) -> io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_follows_axis() {
        assert_eq!(
            ResizeCursor::for_direction(Direction::Horizontal).shape_name(),
            "col-resize"
        );
        assert_eq!(
            ResizeCursor::for_direction(Direction::Vertical).shape_name(),
            "row-resize"
        );
    }
}
