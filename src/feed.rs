//! src/feed.rs
//!
//! Demo content shown inside the panels: a random-walk sample series and a
//! bounded log of layout events.

pub mod events;
pub mod series;

/// Re-exports
pub use events::EventLog;
pub use series::Series;
