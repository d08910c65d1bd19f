//! src/term.rs
//!
//! Terminal-side effects: mouse capture and the pointer shape during drags.

use std::fmt;
use std::io::{self, Stdout, Write, stdout};

use crossterm::Command;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use crate::layout::{DragEffects, ResizeCursor};

/// OSC 22: ask the terminal for a named pointer shape. Terminals without
/// support ignore it.
#[derive(Clone, Copy, Debug)]
pub struct SetPointerShape(pub &'static str);

impl Command for SetPointerShape {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b]22;{}\x1b\\", self.0)
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Drag effects on the real terminal.
pub struct TerminalEffects<W: Write> {
    out: W,
    dragging: bool,
}

impl TerminalEffects<Stdout> {
    pub fn stdout() -> Self {
        Self::new(stdout())
    }
}

impl<W: Write> TerminalEffects<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            dragging: false,
        }
    }

    pub fn enable_mouse(&mut self) -> io::Result<()> {
        execute!(self.out, EnableMouseCapture)
    }

    /// Release the mouse and put the pointer back, whatever state we are in.
    pub fn restore(&mut self) -> io::Result<()> {
        self.end_drag()?;
        execute!(self.out, DisableMouseCapture)
    }
}

impl<W: Write> DragEffects for TerminalEffects<W> {
    fn begin_drag(&mut self, cursor: ResizeCursor) -> io::Result<()> {
        self.dragging = true;
        execute!(self.out, SetPointerShape(cursor.shape_name()))
    }

    fn end_drag(&mut self) -> io::Result<()> {
        if !self.dragging {
            return Ok(());
        }
        self.dragging = false;
        execute!(self.out, SetPointerShape("default"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(fx: TerminalEffects<Vec<u8>>) -> String {
        String::from_utf8(fx.out).unwrap()
    }

    #[test]
    fn drag_sets_and_resets_pointer_shape() {
        let mut fx = TerminalEffects::new(Vec::new());
        fx.begin_drag(ResizeCursor::Row).unwrap();
        fx.end_drag().unwrap();
        assert_eq!(
            written(fx),
            "\x1b]22;row-resize\x1b\\\x1b]22;default\x1b\\"
        );
    }

    #[test]
    fn end_without_begin_writes_nothing() {
        let mut fx = TerminalEffects::new(Vec::new());
        fx.end_drag().unwrap();
        assert!(written(fx).is_empty());
    }
}
