//! src/layout/persist.rs
//!
//! JSON layout snapshots so panel sizes survive restarts.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Sizes of one group at the time of the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// Panel order when saved. Informational: restoring never reorders.
    #[serde(default)]
    pub order: Vec<String>,
    pub sizes: BTreeMap<String, f64>,
    /// Panels that were collapsed. Their entry in `sizes` is the size they
    /// expand back to.
    #[serde(default)]
    pub collapsed: BTreeSet<String>,
}

/// Every group of a workspace, keyed by group name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub groups: BTreeMap<String, GroupSnapshot>,
}

/// Read a snapshot. A missing file is not an error.
pub fn load(path: &Path) -> Result<Option<LayoutSnapshot>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).wrap_err_with(|| format!("reading layout {}", path.display()));
        }
    };
    let snapshot = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("parsing layout {}", path.display()))?;
    Ok(Some(snapshot))
}

/// Write a snapshot, creating parent directories as needed.
pub fn save(path: &Path, snapshot: &LayoutSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating {}", parent.display()))?;
    }
    let raw = serde_json::to_string_pretty(snapshot).wrap_err("serializing layout")?;
    fs::write(path, raw).wrap_err_with(|| format!("writing layout {}", path.display()))?;
    info!(path = %path.display(), groups = snapshot.groups.len(), "layout saved");
    Ok(())
}
