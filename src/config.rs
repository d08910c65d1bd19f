//! src/config.rs
//!
//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ratatui::layout::Direction;

use crate::layout::group::DEFAULT_MIN_PANEL_PERCENT;

/// Main axis of the root panel group. Nested groups use the other one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

impl From<Axis> for Direction {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Direction::Horizontal,
            Axis::Vertical => Direction::Vertical,
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(name = "splitdeck", version, about = "Terminal workspace of resizable panel groups")]
pub struct AppConfig {
    /// Main axis of the root group.
    #[arg(long, value_enum, default_value_t = Axis::Horizontal)]
    pub direction: Axis,

    /// Smallest share (percent) a panel can be dragged down to.
    #[arg(long, default_value_t = DEFAULT_MIN_PANEL_PERCENT, value_parser = parse_floor)]
    pub min_panel_percent: f64,

    /// Where panel sizes are saved between runs.
    #[arg(long)]
    pub layout_file: Option<PathBuf>,

    /// Neither load nor save the layout file.
    #[arg(long)]
    pub no_persist: bool,

    /// Address of the line-based control server.
    #[arg(long, default_value = "127.0.0.1:4000")]
    pub remote_addr: String,

    /// Do not start the control server.
    #[arg(long)]
    pub no_remote: bool,

    /// Target frame time in milliseconds.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub frame_ms: u64,
}

impl AppConfig {
    /// Layout file to use, or `None` when persistence is off or no config
    /// directory can be found.
    pub fn layout_path(&self) -> Option<PathBuf> {
        if self.no_persist {
            return None;
        }
        self.layout_file.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join("splitdeck").join("layout.json"))
        })
    }
}

/// Floors must leave room for two panels to share a handle.
fn parse_floor(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !(0.0..50.0).contains(&value) {
        return Err(format!("{value} is outside 0..50"));
    }
    Ok(value)
}
