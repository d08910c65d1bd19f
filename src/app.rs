//! src/app.rs
//!
//! Terminal workspace of resizable panel groups.
//!
//! # Top-Level Application (`app.rs`)
//!
//! Builds the panel groups, restores the saved layout, starts the remote
//! control thread, and runs the UI main loop.
//!
//! ## Overview
//! The screen is a title bar, a body and a footer. The body is the `root`
//! group (sidebar, main, inspector) laid out along `--direction`; the main
//! panel is itself the `main` group (activity, events) along the other axis.
//! Each group keeps its own sizes; dragging one never shifts the other.
//!
//! # Mouse
//!
//! - **Drag a divider** to move the boundary between its two panels. Only
//!   that pair changes size and their combined size stays the same.
//!   A move that would shrink either panel under `--min-panel-percent` is
//!   ignored until the pointer comes back into range.
//! - **Double-click a divider** to put its group back to the default sizes.
//! - Releasing the button anywhere ends the drag.
//!
//! # Keyboard Controls
//!
//! - **Tab** — Cycle the focused divider across all groups.
//! - **← / ↑**, **→ / ↓** — Move the focused divider by 1% (5% with Shift).
//! - **c** — Collapse/expand the panel after the focused divider. A
//!   collapsed panel keeps its size; moving either of its dividers expands it.
//! - **Esc** — Cancel the current drag and put the sizes back.
//! - **i** — Show/hide the inspector panel (unmounts it from the root group).
//! - **r** — Reset every group to its default sizes and expand all panels.
//! - **w** — Write the layout file now.
//! - **q** — Quit, save the layout and restore the terminal.
//!
//! # Remote TCP Protocol (ASCII, Line-Based)
//!
//! **Default bind address:** `127.0.0.1:4000` (`--remote-addr`,
//! `--no-remote`). One reply line per command, `OK ...` or `ERR <msg>`.
//!
//! - `groups` — names of all groups.
//! - `sizes <group>` — `OK id=size ...` in panel order.
//! - `resize <group> <handle> <percent>` — place divider `<handle>` at
//!   `<percent>` of the group; `ERR rejected` when below the floor.
//! - `reset <group>` — back to default sizes.
//! - `collapse <group> <panel>` — toggle collapse; `OK collapsed` or
//!   `OK expanded`.
//! - `save` — write the layout file.
//! - `quit` — close the connection.
//!
//! Lines longer than 1 KiB are answered with `ERR line too long` and skipped.
//!
//! ```text
//! $ nc 127.0.0.1 4000
//! sizes root
//! OK sidebar=22.00 main=53.00 inspector=25.00
//! resize root 0 30
//! OK
//! ```
//!
//! # Layout File
//!
//! Sizes are loaded at startup and saved on exit as JSON
//! (`--layout-file`, default `<config dir>/splitdeck/layout.json`,
//! `--no-persist` to disable).

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use rand::rngs::ThreadRng;
use ratatui::DefaultTerminal;
use ratatui::layout::{Constraint, Direction};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::feed::{EventLog, Series};
use crate::layout::persist;
use crate::layout::{
    DEFAULT_PANEL_SIZE, DragEffects, GroupKey, GroupOptions, HandleId, PanelGroup, Press,
    ResizeOutcome, Workspace,
};
use crate::net::remote::{RemoteCommand, RemoteRequest, remote_server};
use crate::panels::{
    ActivityPanel, EventsPanel, GroupReport, ParagraphPanel, SizesPanel, TitlePanel,
};
use crate::term::TerminalEffects;
use crate::ui::{Node, group, leaf, resizable, slot};

const HELP: &[&str] = &[
    "drag  move a divider",
    "dbl-click  reset group",
    "Tab  focus next divider",
    "arrows  nudge divider",
    "c  collapse panel",
    "Esc  cancel drag",
    "i  toggle inspector",
    "r  reset all",
    "w  save layout",
    "q  quit",
];

struct App {
    ws: Workspace,
    root: GroupKey,
    main: GroupKey,
    show_inspector: bool,
    focus: Option<(GroupKey, HandleId)>,
    series: Series,
    events: EventLog,
    rng: ThreadRng,
    layout_path: Option<PathBuf>,
    log_dir: Option<PathBuf>,
    running: bool,
}

impl App {
    fn new(config: &AppConfig, log_dir: Option<PathBuf>) -> Self {
        let options = GroupOptions {
            min_panel_percent: config.min_panel_percent,
        };
        let mut ws = Workspace::new();
        let root = ws.add_group(PanelGroup::with_options(
            "root",
            config.direction.into(),
            options,
        ));
        let main = ws.add_group(PanelGroup::with_options(
            "main",
            config.direction.cross().into(),
            options,
        ));
        Self {
            ws,
            root,
            main,
            show_inspector: true,
            focus: None,
            series: Series::new(240, 100),
            events: EventLog::new(200),
            rng: rand::rng(),
            layout_path: config.layout_path(),
            log_dir,
            running: true,
        }
    }

    /// Name a handle for the event log, e.g. `root/handle-0`.
    fn label(&self, key: GroupKey, handle: HandleId) -> String {
        format!("{}/{}", self.ws.group(key).name(), handle)
    }

    fn restore_layout(&mut self) {
        let Some(path) = &self.layout_path else {
            return;
        };
        match persist::load(path) {
            Ok(Some(snapshot)) => {
                self.ws.restore(&snapshot);
                self.events.push(format!("layout loaded from {}", path.display()));
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = ?e, "ignoring unreadable layout file");
                self.events.push("layout file unreadable, using defaults");
            }
        }
    }

    fn save_layout(&mut self) -> Result<Option<PathBuf>> {
        let Some(path) = self.layout_path.clone() else {
            return Ok(None);
        };
        persist::save(&path, &self.ws.snapshot())?;
        Ok(Some(path))
    }

    /// Save the layout after the main loop. A failed save is logged and
    /// never replaces the loop's own result.
    fn save_on_exit(&mut self, result: Result<()>) -> Result<()> {
        match self.save_layout() {
            Ok(Some(path)) => info!(path = %path.display(), "layout written on exit"),
            Ok(None) => {}
            Err(e) => warn!(error = ?e, "saving layout on exit failed"),
        }
        result
    }

    /// Compose this frame's tree.
    fn build_tree(&self) -> Node {
        let reports: Vec<GroupReport> = self
            .ws
            .groups()
            .map(|(key, g)| {
                let focused = self.focus.filter(|(k, _)| *k == key).map(|(_, h)| h);
                GroupReport::from_group(g, focused)
            })
            .collect();

        let status = self.ws.groups().find_map(|(key, g)| {
            g.active_handle()
                .map(|h| format!("dragging {}", self.label(key, h)))
        });

        let main_group = resizable(
            self.main,
            vec![
                slot(
                    "activity",
                    60.0,
                    leaf(Box::new(ActivityPanel::new("Activity", &self.series))),
                ),
                slot("events", 40.0, leaf(Box::new(EventsPanel::new(&self.events)))),
            ],
        );

        let mut root_slots = vec![
            slot("sidebar", 22.0, leaf(Box::new(SizesPanel::new(reports)))),
            slot("main", 53.0, main_group),
        ];
        if self.show_inspector {
            root_slots.push(slot(
                "inspector",
                DEFAULT_PANEL_SIZE,
                leaf(Box::new(ParagraphPanel::new("Inspector", HELP))),
            ));
        }

        let footer = match &self.log_dir {
            Some(dir) => format!("logs: {}", dir.display()),
            None => "logging disabled".to_string(),
        };

        group(
            Direction::Vertical,
            vec![
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ],
            vec![
                leaf(Box::new(TitlePanel::new("Resizable panel groups", status))),
                resizable(self.root, root_slots),
                leaf(Box::new(ParagraphPanel::new(
                    "Footer",
                    &["q  quit", footer.as_str()],
                ))),
            ],
        )
    }

    fn handle_event(&mut self, ev: Event, effects: &mut dyn DragEffects) {
        match ev {
            Event::Mouse(m) => self.handle_mouse(m, effects),
            Event::Key(k) if k.kind == KeyEventKind::Press => self.handle_key(k, effects),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent, effects: &mut dyn DragEffects) {
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                match self.ws.pointer_down(m.column, m.row, Instant::now(), effects) {
                    Press::Grabbed(key, handle) => {
                        self.focus = Some((key, handle));
                        let label = self.label(key, handle);
                        self.events.push(format!("grab {label}"));
                    }
                    Press::Reset(key) => {
                        let name = self.ws.group(key).name().to_string();
                        self.events.push(format!("reset {name}"));
                    }
                    Press::Missed => {}
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.ws.pointer_drag(m.column, m.row);
            }
            MouseEventKind::Up(_) => {
                if let Some((key, handle)) = self.ws.pointer_up(effects) {
                    let sizes = self
                        .ws
                        .group(key)
                        .sizes()
                        .iter()
                        .map(|(id, s)| format!("{id}={s:.1}"))
                        .collect::<Vec<_>>()
                        .join(" ");
                    let label = self.label(key, handle);
                    self.events.push(format!("release {label} {sizes}"));
                }
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent, effects: &mut dyn DragEffects) {
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5.0
        } else {
            1.0
        };
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Esc => {
                if let Some((key, handle)) = self.ws.cancel_drag(effects) {
                    let label = self.label(key, handle);
                    self.events.push(format!("cancel {label}, sizes restored"));
                }
            }
            KeyCode::Char('c') => self.collapse_focused(),
            KeyCode::Char('i') => {
                self.show_inspector = !self.show_inspector;
                let state = if self.show_inspector { "mounted" } else { "unmounted" };
                self.events.push(format!("inspector {state}"));
            }
            KeyCode::Char('r') => {
                for k in self.group_keys() {
                    self.ws.group_mut(k).reset_sizes();
                }
                self.events.push("reset all groups");
            }
            KeyCode::Char('w') => match self.save_layout() {
                Ok(Some(path)) => self.events.push(format!("saved {}", path.display())),
                Ok(None) => self.events.push("persistence disabled"),
                Err(e) => {
                    warn!(error = ?e, "saving layout failed");
                    self.events.push("save failed, see log");
                }
            },
            KeyCode::Tab => self.focus_next(),
            KeyCode::Left | KeyCode::Up => self.nudge_focused(-step),
            KeyCode::Right | KeyCode::Down => self.nudge_focused(step),
            _ => {}
        }
    }

    fn group_keys(&self) -> Vec<GroupKey> {
        self.ws.groups().map(|(k, _)| k).collect()
    }

    /// Move focus to the next handle, across groups, wrapping around.
    fn focus_next(&mut self) {
        let all: Vec<(GroupKey, HandleId)> = self
            .ws
            .groups()
            .flat_map(|(k, g)| g.handles().iter().map(move |h| (k, h.id)))
            .collect();
        if all.is_empty() {
            self.focus = None;
            return;
        }
        let next = match self.focus.and_then(|f| all.iter().position(|x| *x == f)) {
            Some(i) => all[(i + 1) % all.len()],
            None => all[0],
        };
        self.focus = Some(next);
    }

    fn nudge_focused(&mut self, delta: f64) {
        let Some((key, handle)) = self.focus else {
            return;
        };
        if self.ws.group_mut(key).nudge_handle(handle, delta) == ResizeOutcome::Unresolved {
            self.focus = None;
        }
    }

    /// Toggle the panel after the focused divider.
    fn collapse_focused(&mut self) {
        let Some((key, handle)) = self.focus else {
            self.events.push("focus a divider first (Tab)");
            return;
        };
        let g = self.ws.group_mut(key);
        let Some(panel) = g.handles().get(handle.index()).map(|h| h.next.clone()) else {
            self.focus = None;
            return;
        };
        if let Some(collapsed) = g.toggle_collapse(&panel) {
            let state = if collapsed { "collapsed" } else { "expanded" };
            let name = g.name().to_string();
            self.events.push(format!("{name}/{panel} {state}"));
        }
    }

    /// Answer one remote command. Runs on the UI thread.
    fn answer(&mut self, command: RemoteCommand) -> String {
        match command {
            RemoteCommand::Groups => {
                let names: Vec<&str> = self.ws.groups().map(|(_, g)| g.name()).collect();
                format!("OK {}", names.join(" "))
            }
            RemoteCommand::Sizes { group } => match self.ws.find(&group) {
                Some(key) => {
                    let sizes: Vec<String> = self
                        .ws
                        .group(key)
                        .sizes()
                        .iter()
                        .map(|(id, s)| format!("{id}={s:.2}"))
                        .collect();
                    format!("OK {}", sizes.join(" ")).trim_end().to_string()
                }
                None => format!("ERR no group {group}"),
            },
            RemoteCommand::Resize {
                group,
                handle,
                percent,
            } => {
                let Some(key) = self.ws.find(&group) else {
                    return format!("ERR no group {group}");
                };
                // never interleave with a pointer drag
                if self.ws.is_resizing() {
                    return "ERR busy".to_string();
                }
                let g = self.ws.group_mut(key);
                g.start_resizing(HandleId(handle));
                let outcome = g.resize_to_percent(percent);
                g.stop_resizing();
                match outcome {
                    ResizeOutcome::Applied => {
                        self.events
                            .push(format!("remote resize {group}/handle-{handle} to {percent:.1}%"));
                        "OK".to_string()
                    }
                    ResizeOutcome::BelowFloor => "ERR rejected".to_string(),
                    ResizeOutcome::Unresolved => format!("ERR no handle {handle}"),
                    ResizeOutcome::Idle | ResizeOutcome::NoBounds => "ERR idle".to_string(),
                }
            }
            RemoteCommand::Reset { group } => match self.ws.find(&group) {
                Some(key) => {
                    self.ws.group_mut(key).reset_sizes();
                    self.events.push(format!("remote reset {group}"));
                    "OK".to_string()
                }
                None => format!("ERR no group {group}"),
            },
            RemoteCommand::Collapse { group, panel } => {
                let Some(key) = self.ws.find(&group) else {
                    return format!("ERR no group {group}");
                };
                match self.ws.group_mut(key).toggle_collapse(&panel) {
                    Some(collapsed) => {
                        let state = if collapsed { "collapsed" } else { "expanded" };
                        self.events.push(format!("remote {group}/{panel} {state}"));
                        format!("OK {state}")
                    }
                    None => format!("ERR no panel {panel}"),
                }
            }
            RemoteCommand::Save => match self.save_layout() {
                Ok(Some(path)) => format!("OK {}", path.display()),
                Ok(None) => "ERR persistence disabled".to_string(),
                Err(e) => {
                    warn!(error = ?e, "remote save failed");
                    "ERR save failed".to_string()
                }
            },
        }
    }

    fn drain_remote(&mut self, rx: &Receiver<RemoteRequest>) {
        while let Ok(req) = rx.try_recv() {
            let reply = self.answer(req.command);
            let _ = req.reply.send(reply);
        }
    }

    fn run_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        effects: &mut dyn DragEffects,
        rx: &Receiver<RemoteRequest>,
        frame_time: Duration,
    ) -> Result<()> {
        while self.running {
            let frame_start = Instant::now();
            self.series.step(&mut self.rng);

            let tree = self.build_tree();
            self.ws.begin_frame();
            tree.mount(&mut self.ws);
            terminal.draw(|f| tree.draw(f, f.area(), &mut self.ws))?;

            self.drain_remote(rx);

            while event::poll(Duration::from_millis(0))? {
                let ev = event::read()?;
                self.handle_event(ev, effects);
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        }
        Ok(())
    }
}

pub fn run(config: AppConfig, log_dir: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(&config, log_dir);
    app.restore_layout();

    let (tx, rx) = mpsc::channel();
    if !config.no_remote {
        match std::net::TcpListener::bind(&config.remote_addr) {
            Ok(listener) => {
                info!(addr = %config.remote_addr, "remote control listening");
                thread::spawn(move || remote_server(listener, tx));
            }
            Err(e) => {
                warn!(addr = %config.remote_addr, error = %e, "remote control disabled");
                app.events.push(format!("remote bind failed: {e}"));
            }
        }
    }

    // UI setup
    let mut terminal = ratatui::init();
    let mut effects = TerminalEffects::stdout();
    if let Err(e) = effects.enable_mouse() {
        warn!(error = %e, "mouse capture unavailable");
    }

    let result = app.run_loop(
        &mut terminal,
        &mut effects,
        &rx,
        Duration::from_millis(config.frame_ms),
    );

    if let Err(e) = effects.restore() {
        warn!(error = %e, "could not release mouse");
    }
    ratatui::restore();

    app.save_on_exit(result)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn app() -> App {
        let config = AppConfig::try_parse_from(["splitdeck", "--no-persist", "--no-remote"])
            .expect("config");
        let mut app = App::new(&config, None);
        app.build_tree().mount(&mut app.ws);
        app
    }

    #[test]
    fn tree_mounts_both_groups() {
        let app = app();
        assert_eq!(
            app.ws.group(app.root).order(),
            ["sidebar", "main", "inspector"]
        );
        assert_eq!(app.ws.group(app.main).order(), ["activity", "events"]);
        assert_eq!(app.ws.group(app.main).direction(), Direction::Vertical);
    }

    #[test]
    fn hiding_the_inspector_unmounts_it() {
        let mut app = app();
        app.show_inspector = false;
        app.build_tree().mount(&mut app.ws);
        assert_eq!(app.ws.group(app.root).panel_size("inspector"), None);
        assert_eq!(app.ws.group(app.root).handles().len(), 1);
    }

    #[test]
    fn remote_sizes_and_resize() {
        let mut app = app();
        assert_eq!(app.answer(RemoteCommand::Groups), "OK root main");
        assert_eq!(
            app.answer(RemoteCommand::Sizes {
                group: "root".into()
            }),
            "OK sidebar=22.00 main=53.00 inspector=25.00"
        );
        assert_eq!(
            app.answer(RemoteCommand::Resize {
                group: "root".into(),
                handle: 0,
                percent: 30.0,
            }),
            "OK"
        );
        assert_eq!(app.ws.group(app.root).panel_size("main"), Some(45.0));
        assert!(!app.ws.is_resizing());
    }

    #[test]
    fn remote_resize_below_floor_is_rejected() {
        let mut app = app();
        let reply = app.answer(RemoteCommand::Resize {
            group: "main".into(),
            handle: 0,
            percent: 98.0,
        });
        assert_eq!(reply, "ERR rejected");
        assert_eq!(app.ws.group(app.main).panel_size("activity"), Some(60.0));
    }

    #[test]
    fn remote_errors() {
        let mut app = app();
        assert_eq!(
            app.answer(RemoteCommand::Reset {
                group: "nope".into()
            }),
            "ERR no group nope"
        );
        assert_eq!(
            app.answer(RemoteCommand::Resize {
                group: "root".into(),
                handle: 9,
                percent: 50.0,
            }),
            "ERR no handle 9"
        );
        assert_eq!(app.answer(RemoteCommand::Save), "ERR persistence disabled");
    }

    #[test]
    fn keyboard_focus_and_nudge() {
        let mut app = app();
        app.focus_next();
        assert_eq!(app.focus, Some((app.root, HandleId(0))));
        app.nudge_focused(3.0);
        assert_eq!(app.ws.group(app.root).panel_size("sidebar"), Some(25.0));

        // root has two handles, main one; the third Tab lands in main
        app.focus_next();
        app.focus_next();
        assert_eq!(app.focus, Some((app.main, HandleId(0))));
        app.focus_next();
        assert_eq!(app.focus, Some((app.root, HandleId(0))));
    }

    #[test]
    fn collapse_by_key_and_remote() {
        let mut app = app();
        app.collapse_focused();
        assert!(app.focus.is_none());

        // second root divider sits before the inspector
        app.focus = Some((app.root, HandleId(1)));
        app.collapse_focused();
        assert!(app.ws.group(app.root).is_collapsed("inspector"));
        assert_eq!(app.ws.group(app.root).panel_size("inspector"), Some(25.0));

        let toggle = RemoteCommand::Collapse {
            group: "root".into(),
            panel: "inspector".into(),
        };
        assert_eq!(app.answer(toggle.clone()), "OK expanded");
        assert_eq!(app.answer(toggle), "OK collapsed");
        assert_eq!(
            app.answer(RemoteCommand::Collapse {
                group: "root".into(),
                panel: "nope".into(),
            }),
            "ERR no panel nope"
        );

        app.answer(RemoteCommand::Reset {
            group: "root".into(),
        });
        assert!(!app.ws.group(app.root).is_collapsed("inspector"));
    }

    #[test]
    fn escape_cancels_the_drag() {
        let mut app = app();
        let mut fx = TerminalEffects::new(Vec::new());
        let g = app.ws.group_mut(app.root);
        g.start_resizing(HandleId(0));
        g.resize_to_percent(40.0);
        assert_eq!(app.ws.group(app.root).panel_size("sidebar"), Some(40.0));

        app.handle_key(KeyEvent::from(KeyCode::Esc), &mut fx);
        assert!(!app.ws.is_resizing());
        assert_eq!(app.ws.group(app.root).panel_size("sidebar"), Some(22.0));
    }

    #[test]
    fn failed_exit_save_keeps_the_loop_error() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the layout's parent directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("layout.json");
        let config = AppConfig::try_parse_from([
            "splitdeck",
            "--no-remote",
            "--layout-file",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let mut app = App::new(&config, None);

        let err = app
            .save_on_exit(Err(color_eyre::eyre::eyre!("terminal gone")))
            .unwrap_err();
        assert_eq!(err.to_string(), "terminal gone");
        assert!(app.save_on_exit(Ok(())).is_ok());
    }

    #[test]
    fn saving_writes_the_layout_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        let config = AppConfig::try_parse_from([
            "splitdeck",
            "--no-remote",
            "--layout-file",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let mut app = App::new(&config, None);
        app.build_tree().mount(&mut app.ws);
        assert!(app.answer(RemoteCommand::Save).starts_with("OK "));

        let mut again = App::new(&config, None);
        again.ws.group_mut(again.root).register_panel("sidebar", 10.0);
        again.restore_layout();
        assert_eq!(again.ws.group(again.root).panel_size("sidebar"), Some(22.0));
    }
}
