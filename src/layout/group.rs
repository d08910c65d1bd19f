//! src/layout/group.rs
//!
//! Authoritative size state for one resizable panel group.
//!
//! A `PanelGroup` owns the panel order, every panel's share of the main axis
//! (in percent), and the drag session. Panels and handles never hold sizes of
//! their own; they ask the group.
//!
//! Resizing is pair-local: dragging handle `i` only ever rewrites the two
//! panels it separates, and their combined size (the pair budget) is
//! conserved. Moves that would push either neighbour under the configured
//! floor are dropped whole instead of being clamped.
//!
//! A collapsed panel keeps its recorded size but is drawn at zero cells.
//! Resizing either side of it expands it again.

use std::collections::{BTreeMap, HashMap, HashSet};

use ratatui::layout::{Direction, Rect};
use tracing::{debug, trace};

use super::handle::{self, Handle, HandleId};
use super::persist::GroupSnapshot;

/// Smallest share a panel may be resized down to, in percent.
pub const DEFAULT_MIN_PANEL_PERCENT: f64 = 5.0;

/// Size used for a panel declared without an explicit default.
pub const DEFAULT_PANEL_SIZE: f64 = 25.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupOptions {
    /// Resize floor for either neighbour of a dragged handle.
    pub min_panel_percent: f64,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            min_panel_percent: DEFAULT_MIN_PANEL_PERCENT,
        }
    }
}

/// What a single resize request did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Both neighbours were updated.
    Applied,
    /// No handle is being dragged.
    Idle,
    /// The handle no longer sits between two registered panels.
    Unresolved,
    /// One neighbour would have dropped below the floor; nothing changed.
    BelowFloor,
    /// The group has not been laid out yet, so a pointer cannot be mapped.
    NoBounds,
}

#[derive(Debug)]
pub struct PanelGroup {
    name: String,
    direction: Direction,
    options: GroupOptions,

    /// Registration order; never re-sorted.
    order: Vec<String>,
    sizes: HashMap<String, f64>,

    /// Size each panel was registered with, for `reset_sizes`.
    defaults: HashMap<String, f64>,
    /// Sizes restored from a snapshot, consumed on first registration.
    saved: HashMap<String, f64>,

    collapsed: HashSet<String>,
    /// Collapse flags restored from a snapshot, consumed like `saved`.
    saved_collapsed: HashSet<String>,

    handles: Vec<Handle>,
    active_handle: Option<HandleId>,
    /// Sizes and collapse flags when the drag began, for `cancel_resizing`.
    drag_origin: Option<(HashMap<String, f64>, HashSet<String>)>,

    /// Last drawn container rect.
    bounds: Option<Rect>,
    /// Last drawn handle rects, rebuilt every frame.
    handle_areas: Vec<(HandleId, Rect)>,
}

impl PanelGroup {
    pub fn new(name: &str, direction: Direction) -> Self {
        Self::with_options(name, direction, GroupOptions::default())
    }

    pub fn with_options(name: &str, direction: Direction, options: GroupOptions) -> Self {
        Self {
            name: name.to_string(),
            direction,
            options,
            order: Vec::new(),
            sizes: HashMap::new(),
            defaults: HashMap::new(),
            saved: HashMap::new(),
            collapsed: HashSet::new(),
            saved_collapsed: HashSet::new(),
            handles: Vec::new(),
            active_handle: None,
            drag_origin: None,
            bounds: None,
            handle_areas: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn active_handle(&self) -> Option<HandleId> {
        self.active_handle
    }

    pub fn is_resizing(&self) -> bool {
        self.active_handle.is_some()
    }

    /// Register a panel (mount).
    ///
    /// The id is appended to the order if absent. Its size is only written
    /// when no entry exists yet, so repeated registration keeps whatever the
    /// panel has been resized to.
    pub fn register_panel(&mut self, id: &str, initial_size: f64) {
        if !self.order.iter().any(|p| p == id) {
            self.order.push(id.to_string());
            self.rebuild_handles();
        }
        if !self.sizes.contains_key(id) {
            let size = self.saved.remove(id).unwrap_or(initial_size);
            self.sizes.insert(id.to_string(), size);
            self.defaults.insert(id.to_string(), initial_size);
            if self.saved_collapsed.remove(id) {
                self.collapsed.insert(id.to_string());
            }
            debug!(group = %self.name, panel = id, size, "panel registered");
        }
    }

    /// Remove a panel (unmount). Remaining panels keep their sizes.
    pub fn unregister_panel(&mut self, id: &str) {
        let before = self.order.len();
        self.order.retain(|p| p != id);
        self.sizes.remove(id);
        self.defaults.remove(id);
        self.collapsed.remove(id);
        if self.order.len() != before {
            self.rebuild_handles();
            debug!(group = %self.name, panel = id, "panel unregistered");
        }
    }

    /// Current size of `id`, or `None` if it is not registered.
    pub fn panel_size(&self, id: &str) -> Option<f64> {
        self.sizes.get(id).copied()
    }

    /// Size a panel is drawn at: its recorded size, else its own default.
    pub fn size_or_default(&self, id: &str, default_size: f64) -> f64 {
        self.panel_size(id).unwrap_or(default_size)
    }

    /// Registered panels and their sizes, in order.
    pub fn sizes(&self) -> Vec<(&str, f64)> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.sizes.get(id).copied().unwrap_or(0.0)))
            .collect()
    }

    pub fn total_percent(&self) -> f64 {
        self.sizes.values().sum()
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    /// Collapse or expand a registered panel. Returns the new state, or
    /// `None` if `id` is not registered.
    pub fn toggle_collapse(&mut self, id: &str) -> Option<bool> {
        if !self.sizes.contains_key(id) {
            return None;
        }
        let collapsed = if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.to_string())
        };
        debug!(group = %self.name, panel = id, collapsed, "collapse toggled");
        Some(collapsed)
    }

    /// Reconcile the registered panels with the ones currently rendered.
    ///
    /// Panels missing from `panels` are unregistered, new ones registered with
    /// their default. Existing panels are left alone.
    pub fn sync_panels(&mut self, panels: &[(&str, f64)]) {
        let gone: Vec<String> = self
            .order
            .iter()
            .filter(|id| !panels.iter().any(|(p, _)| *p == id.as_str()))
            .cloned()
            .collect();
        for id in gone {
            self.unregister_panel(&id);
        }
        for (id, default_size) in panels {
            if !self.sizes.contains_key(*id) {
                self.register_panel(id, *default_size);
            }
        }
    }

    /// Begin a drag session on `handle_id`.
    pub fn start_resizing(&mut self, handle_id: HandleId) {
        self.active_handle = Some(handle_id);
        self.drag_origin = Some((self.sizes.clone(), self.collapsed.clone()));
        if let Some(h) = self.handles.get_mut(handle_id.index()) {
            h.is_active = true;
        }
        debug!(group = %self.name, handle = %handle_id, "resize started");
    }

    /// End the drag session. Returns the handle that was active, if any.
    pub fn stop_resizing(&mut self) -> Option<HandleId> {
        for h in &mut self.handles {
            h.is_active = false;
        }
        self.drag_origin = None;
        let ended = self.active_handle.take();
        if let Some(handle_id) = ended {
            debug!(group = %self.name, handle = %handle_id, sizes = ?self.sizes(), "resize stopped");
        }
        ended
    }

    /// End the drag session and put back the sizes and collapse flags it
    /// started from. Panels unregistered meanwhile stay gone.
    pub fn cancel_resizing(&mut self) -> Option<HandleId> {
        if let Some((sizes, collapsed)) = self.drag_origin.take() {
            for (id, size) in sizes {
                if let Some(current) = self.sizes.get_mut(&id) {
                    *current = size;
                }
            }
            self.collapsed = collapsed
                .into_iter()
                .filter(|id| self.sizes.contains_key(id))
                .collect();
            debug!(group = %self.name, "resize cancelled");
        }
        self.stop_resizing()
    }

    /// Map a pointer cell to a percentage along the main axis of the last
    /// drawn container.
    pub fn relative_percent(&self, column: u16, row: u16) -> Option<f64> {
        let bounds = self.bounds?;
        let (pos, start, extent) = match self.direction {
            Direction::Horizontal => (column, bounds.x, bounds.width),
            Direction::Vertical => (row, bounds.y, bounds.height),
        };
        if extent == 0 {
            return None;
        }
        Some((f64::from(pos) - f64::from(start)) / f64::from(extent) * 100.0)
    }

    /// Handle a pointer move while dragging.
    pub fn pointer_moved(&mut self, column: u16, row: u16) -> ResizeOutcome {
        if self.active_handle.is_none() {
            return ResizeOutcome::Idle;
        }
        match self.relative_percent(column, row) {
            Some(percent) => self.resize_to_percent(percent),
            None => ResizeOutcome::NoBounds,
        }
    }

    /// Move the active handle so the boundary sits at `relative_percent` of
    /// the container.
    pub fn resize_to_percent(&mut self, relative_percent: f64) -> ResizeOutcome {
        match self.active_handle {
            Some(handle_id) => self.split_at(handle_id, relative_percent),
            None => ResizeOutcome::Idle,
        }
    }

    /// Shift a handle's boundary by `delta` percent (keyboard resizing).
    pub fn nudge_handle(&mut self, handle_id: HandleId, delta: f64) -> ResizeOutcome {
        self.expand_neighbours(handle_id);
        let Some(h) = self.handles.get(handle_id.index()) else {
            return ResizeOutcome::Unresolved;
        };
        let boundary = self.start_of(&h.prev) + self.sizes.get(&h.prev).copied().unwrap_or(0.0);
        self.split_at(handle_id, boundary + delta)
    }

    /// Put every registered panel back to the size it was registered with
    /// and expand every collapsed one.
    pub fn reset_sizes(&mut self) {
        self.collapsed.clear();
        for id in &self.order {
            if let Some(default_size) = self.defaults.get(id) {
                self.sizes.insert(id.clone(), *default_size);
            }
        }
        debug!(group = %self.name, "sizes reset");
    }

    pub fn snapshot(&self) -> GroupSnapshot {
        GroupSnapshot {
            order: self.order.clone(),
            sizes: self
                .sizes
                .iter()
                .map(|(id, size)| (id.clone(), *size))
                .collect::<BTreeMap<_, _>>(),
            collapsed: self.collapsed.iter().cloned().collect(),
        }
    }

    /// Apply saved sizes: registered panels take them now, the rest on their
    /// first registration. Sizes are clamped to `[min_panel_percent, 100]`;
    /// non-finite entries are skipped.
    pub fn restore(&mut self, snapshot: &GroupSnapshot) {
        for (id, size) in &snapshot.sizes {
            if !size.is_finite() {
                continue;
            }
            let size = size.max(self.options.min_panel_percent).min(100.0);
            match self.sizes.get_mut(id) {
                Some(current) => *current = size,
                None => {
                    self.saved.insert(id.clone(), size);
                }
            }
        }
        for id in &snapshot.collapsed {
            if self.sizes.contains_key(id) {
                self.collapsed.insert(id.clone());
            } else {
                self.saved_collapsed.insert(id.clone());
            }
        }
        debug!(group = %self.name, restored = snapshot.sizes.len(), "layout restored");
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Record the container rect and forget last frame's handle rects.
    pub fn set_bounds(&mut self, area: Rect) {
        self.bounds = Some(area);
        self.handle_areas.clear();
    }

    /// Forget last frame's geometry; a group that is not drawn again
    /// cannot be hit or dragged by pointer.
    pub fn clear_geometry(&mut self) {
        self.bounds = None;
        self.handle_areas.clear();
    }

    pub fn record_handle_area(&mut self, handle_id: HandleId, drawn: Rect) {
        self.handle_areas.push((handle_id, drawn));
    }

    /// Handle whose (widened) hit area contains the pointer.
    pub fn handle_at(&self, column: u16, row: u16) -> Option<HandleId> {
        let bounds = self.bounds?;
        self.handle_areas
            .iter()
            .find(|(_, drawn)| {
                handle::contains(handle::hit_area(self.direction, *drawn, bounds), column, row)
            })
            .map(|(id, _)| *id)
    }

    fn rebuild_handles(&mut self) {
        self.handles = handle::rebuild(&self.order, &self.handles);
    }

    /// Drawn offset of `id`: sizes of the expanded panels before it.
    fn start_of(&self, id: &str) -> f64 {
        self.order
            .iter()
            .take_while(|p| p.as_str() != id)
            .filter(|p| !self.collapsed.contains(p.as_str()))
            .map(|p| self.sizes.get(p).copied().unwrap_or(0.0))
            .sum()
    }

    /// Expand both panels next to `handle_id`.
    fn expand_neighbours(&mut self, handle_id: HandleId) {
        let Some(h) = self.handles.get(handle_id.index()) else {
            return;
        };
        for id in [&h.prev, &h.next] {
            if self.collapsed.remove(id.as_str()) {
                debug!(group = %self.name, panel = %id, "expanded by resize");
            }
        }
    }

    /// A collapsed neighbour is expanded even when the move itself is then
    /// rejected.
    fn split_at(&mut self, handle_id: HandleId, relative_percent: f64) -> ResizeOutcome {
        self.expand_neighbours(handle_id);
        let Some(h) = self.handles.get(handle_id.index()) else {
            return ResizeOutcome::Unresolved;
        };
        let (Some(prev_size), Some(next_size)) =
            (self.sizes.get(&h.prev).copied(), self.sizes.get(&h.next).copied())
        else {
            return ResizeOutcome::Unresolved;
        };

        let prev_start = self.start_of(&h.prev);
        let pair_budget = prev_size + next_size;
        let new_prev = relative_percent - prev_start;
        let new_next = pair_budget - new_prev;

        let floor = self.options.min_panel_percent;
        if new_prev < floor || new_next < floor {
            trace!(group = %self.name, handle = %handle_id, new_prev, new_next, "resize below floor");
            return ResizeOutcome::BelowFloor;
        }

        let (prev, next) = (h.prev.clone(), h.next.clone());
        trace!(group = %self.name, handle = %handle_id, %prev, new_prev, %next, new_next, "resize");
        self.sizes.insert(prev, new_prev);
        self.sizes.insert(next, new_next);
        ResizeOutcome::Applied
    }
}
