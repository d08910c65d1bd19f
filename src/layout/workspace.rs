//! src/layout/workspace.rs
//!
//! Independent panel groups on one screen and the pointer routing between
//! them.
//!
//! Each group keeps its own order, sizes and drag session; the workspace only
//! decides which group a pointer event belongs to and tells the host when a
//! drag session starts or ends.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::group::{PanelGroup, ResizeOutcome};
use super::handle::HandleId;
use super::persist::LayoutSnapshot;
use super::session::{DragEffects, ResizeCursor};

/// Two presses on the same handle within this window reset the group.
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

/// Index of a group inside its workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey(usize);

/// Result of a pointer press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Press {
    /// Not on any handle; the event belongs to the panels below.
    Missed,
    /// A drag session started on this handle.
    Grabbed(GroupKey, HandleId),
    /// Second press on the same handle: the group went back to its defaults.
    Reset(GroupKey),
}

#[derive(Debug, Default)]
pub struct Workspace {
    groups: Vec<PanelGroup>,
    last_press: Option<(GroupKey, HandleId, Instant)>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, group: PanelGroup) -> GroupKey {
        self.groups.push(group);
        GroupKey(self.groups.len() - 1)
    }

    pub fn group(&self, key: GroupKey) -> &PanelGroup {
        &self.groups[key.0]
    }

    pub fn group_mut(&mut self, key: GroupKey) -> &mut PanelGroup {
        &mut self.groups[key.0]
    }

    pub fn find(&self, name: &str) -> Option<GroupKey> {
        self.groups.iter().position(|g| g.name() == name).map(GroupKey)
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupKey, &PanelGroup)> {
        self.groups.iter().enumerate().map(|(i, g)| (GroupKey(i), g))
    }

    /// Drop every group's drawn geometry before the next draw.
    pub fn begin_frame(&mut self) {
        for g in &mut self.groups {
            g.clear_geometry();
        }
    }

    /// Handle a primary-button press.
    ///
    /// Later groups are checked first so nested groups win over the group
    /// that contains them.
    pub fn pointer_down(
        &mut self,
        column: u16,
        row: u16,
        now: Instant,
        effects: &mut dyn DragEffects,
    ) -> Press {
        let hit = self
            .groups
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, g)| g.handle_at(column, row).map(|h| (GroupKey(i), h)));
        let Some((key, handle_id)) = hit else {
            self.last_press = None;
            return Press::Missed;
        };

        let repeated = self.last_press.is_some_and(|(k, h, at)| {
            k == key && h == handle_id && now.saturating_duration_since(at) <= DOUBLE_CLICK
        });
        if repeated {
            self.last_press = None;
            self.group_mut(key).reset_sizes();
            return Press::Reset(key);
        }

        self.last_press = Some((key, handle_id, now));
        let group = self.group_mut(key);
        group.start_resizing(handle_id);
        let cursor = ResizeCursor::for_direction(group.direction());
        if let Err(e) = effects.begin_drag(cursor) {
            warn!(error = %e, "could not set resize cursor");
        }
        Press::Grabbed(key, handle_id)
    }

    /// Handle a pointer move with the button held.
    pub fn pointer_drag(&mut self, column: u16, row: u16) -> Option<(GroupKey, ResizeOutcome)> {
        let i = self.groups.iter().position(PanelGroup::is_resizing)?;
        Some((GroupKey(i), self.groups[i].pointer_moved(column, row)))
    }

    /// Handle a button release anywhere on screen. Ends every drag session.
    pub fn pointer_up(&mut self, effects: &mut dyn DragEffects) -> Option<(GroupKey, HandleId)> {
        self.end_drag(effects, PanelGroup::stop_resizing)
    }

    /// Abandon every drag session, undoing its moves.
    pub fn cancel_drag(&mut self, effects: &mut dyn DragEffects) -> Option<(GroupKey, HandleId)> {
        self.end_drag(effects, PanelGroup::cancel_resizing)
    }

    fn end_drag(
        &mut self,
        effects: &mut dyn DragEffects,
        finish: fn(&mut PanelGroup) -> Option<HandleId>,
    ) -> Option<(GroupKey, HandleId)> {
        let mut ended = None;
        for (i, g) in self.groups.iter_mut().enumerate() {
            if let Some(h) = finish(g) {
                ended = Some((GroupKey(i), h));
            }
        }
        if ended.is_some() {
            if let Err(e) = effects.end_drag() {
                warn!(error = %e, "could not restore cursor");
            }
        }
        ended
    }

    pub fn is_resizing(&self) -> bool {
        self.groups.iter().any(PanelGroup::is_resizing)
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            groups: self
                .groups
                .iter()
                .map(|g| (g.name().to_string(), g.snapshot()))
                .collect(),
        }
    }

    /// Hand saved sizes to the groups with matching names.
    pub fn restore(&mut self, snapshot: &LayoutSnapshot) {
        for g in &mut self.groups {
            if let Some(saved) = snapshot.groups.get(g.name()) {
                g.restore(saved);
            }
        }
        let unknown = snapshot
            .groups
            .keys()
            .filter(|name| self.find(name).is_none())
            .count();
        if unknown > 0 {
            debug!(unknown, "snapshot names groups that no longer exist");
        }
    }
}
