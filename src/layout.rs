//! src/layout.rs
//!
//! Resizable panel groups: size state, handles, drag sessions, persistence.

pub mod group;
pub mod handle;
pub mod persist;
pub mod session;
pub mod workspace;

/// Re-exports
pub use group::{DEFAULT_PANEL_SIZE, GroupOptions, PanelGroup, ResizeOutcome};
pub use handle::HandleId;
pub use session::{DragEffects, ResizeCursor};
pub use workspace::{GroupKey, Press, Workspace};
