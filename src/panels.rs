//! src/panels.rs
//!
//! Top-level panels module and re-exports.

pub mod activity;
pub mod events;
pub mod paragraph;
pub mod sizes;
pub mod title;

pub use activity::ActivityPanel;
pub use events::EventsPanel;
pub use paragraph::ParagraphPanel;
pub use sizes::{GroupReport, SizesPanel};
pub use title::TitlePanel;
