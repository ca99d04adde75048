//! Application state and event handling
//!
//! One UI task owns the `App`; spawned network tasks report back over an
//! mpsc channel. Workflow apply/save phases run their calls sequentially
//! and always end in a full snapshot reload. Nothing dedupes overlapping
//! requests: rapid toggles race, and the last server write wins.

use crossterm::event::KeyCode;
use lattice_client::{ClientError, HttpClient};
use shared::Action;
use tokio::sync::mpsc;
use tui_logger::{TuiWidgetEvent, TuiWidgetState};

use crate::resolver::PermissionIndex;
use crate::snapshot::Snapshot;
use crate::workflows::{
    self, ActionToggleModal, FieldEditorModal, LinkEdit, PermissionChange, WorkflowError,
    role_assign,
};

/// Messages sent back to the UI loop by spawned network tasks.
#[derive(Debug)]
pub enum AppMsg {
    /// A full snapshot (re)load finished
    SnapshotLoaded(Result<Snapshot, ClientError>),
    /// A user-role link call succeeded; apply the optimistic local edit
    LinkEdited(LinkEdit),
}

/// Which table the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Users × modules, with per-action grants and field unions
    #[default]
    Matrix,
    /// Users × roles assignment grid
    Roles,
}

/// Open modal. A single slot: one modal at a time by construction.
#[derive(Debug)]
pub enum Modal {
    ActionToggle(ActionToggleModal),
    FieldEditor(FieldEditorModal),
}

/// Outcome of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Quit,
}

pub struct App {
    client: HttpClient,
    tx: mpsc::Sender<AppMsg>,
    /// Current snapshot; `None` until the initial load lands
    pub snapshot: Option<Snapshot>,
    pub view: View,
    /// Cell cursor of the active view
    pub row: usize,
    pub col: usize,
    pub modal: Option<Modal>,
    /// Blocking notice; swallows all input until dismissed
    pub notice: Option<String>,
    /// A workflow's network phase is in flight
    pub syncing: bool,
    /// Logger widget state
    pub logger_state: TuiWidgetState,
}

impl App {
    pub fn new(client: HttpClient, tx: mpsc::Sender<AppMsg>) -> Self {
        Self {
            client,
            tx,
            snapshot: None,
            view: View::default(),
            row: 0,
            col: 0,
            modal: None,
            notice: None,
            syncing: false,
            logger_state: TuiWidgetState::new(),
        }
    }

    /// Kick off the initial five-collection load.
    pub fn spawn_initial_load(&self) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = Snapshot::load(&client).await;
            let _ = tx.send(AppMsg::SnapshotLoaded(result)).await;
        });
    }

    /// Handle a completed background task.
    pub fn handle_msg(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::SnapshotLoaded(Ok(snapshot)) => {
                self.snapshot = Some(snapshot);
                if self.syncing {
                    self.modal = None;
                    self.syncing = false;
                }
                self.clamp_cursor();
            }
            AppMsg::SnapshotLoaded(Err(e)) => {
                // with no snapshot yet, the screen stays in its loading
                // state; otherwise the stale snapshot is kept
                tracing::error!("failed to load directory snapshot: {}", e);
                if self.syncing {
                    self.modal = None;
                    self.syncing = false;
                }
            }
            AppMsg::LinkEdited(edit) => {
                if let Some(snapshot) = self.snapshot.as_mut() {
                    match edit {
                        LinkEdit::Removed(link_id) => {
                            snapshot.user_roles.retain(|l| l.id != link_id)
                        }
                        LinkEdit::Created(link) => snapshot.user_roles.push(link),
                    }
                }
            }
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, code: KeyCode) -> Signal {
        if self.notice.is_some() {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                self.notice = None;
            }
            return Signal::Continue;
        }

        if self.modal.is_some() {
            self.handle_modal_key(code);
            return Signal::Continue;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Signal::Quit,
            KeyCode::Tab => {
                self.view = match self.view {
                    View::Matrix => View::Roles,
                    View::Roles => View::Matrix,
                };
                self.col = 0;
                self.clamp_cursor();
            }
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => {
                let (rows, _) = self.dims();
                if self.row + 1 < rows {
                    self.row += 1;
                }
            }
            KeyCode::Left => self.col = self.col.saturating_sub(1),
            KeyCode::Right => {
                let (_, cols) = self.dims();
                if self.col + 1 < cols {
                    self.col += 1;
                }
            }
            KeyCode::PageUp => self.logger_state.transition(TuiWidgetEvent::PrevPageKey),
            KeyCode::PageDown => self.logger_state.transition(TuiWidgetEvent::NextPageKey),
            KeyCode::Char('r') if self.view == View::Matrix => {
                self.open_action_modal(Action::Read)
            }
            KeyCode::Char('c') if self.view == View::Matrix => {
                self.open_action_modal(Action::Create)
            }
            KeyCode::Char('u') if self.view == View::Matrix => {
                self.open_action_modal(Action::Update)
            }
            KeyCode::Char('d') if self.view == View::Matrix => {
                self.open_action_modal(Action::Delete)
            }
            KeyCode::Char('f') if self.view == View::Matrix => self.open_field_editor(),
            KeyCode::Enter | KeyCode::Char(' ') if self.view == View::Roles => {
                self.toggle_role_cell()
            }
            _ => {}
        }
        Signal::Continue
    }

    /// (rows, cols) of the active view.
    fn dims(&self) -> (usize, usize) {
        match (&self.snapshot, self.view) {
            (Some(s), View::Matrix) => (s.users.len(), s.modules.len()),
            (Some(s), View::Roles) => (s.users.len(), s.roles.len()),
            (None, _) => (0, 0),
        }
    }

    fn clamp_cursor(&mut self) {
        let (rows, cols) = self.dims();
        self.row = self.row.min(rows.saturating_sub(1));
        self.col = self.col.min(cols.saturating_sub(1));
    }

    fn handle_modal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                // cancel: discard the staged edits, no network calls
                self.modal = None;
                return;
            }
            KeyCode::Enter => {
                self.apply_modal();
                return;
            }
            _ => {}
        }

        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let index = PermissionIndex::build(snapshot);
        match &mut self.modal {
            Some(Modal::ActionToggle(modal)) => match code {
                KeyCode::Up => modal.select_prev(),
                KeyCode::Down => modal.select_next(),
                KeyCode::Char(' ') => modal.toggle_selected(),
                _ => {}
            },
            Some(Modal::FieldEditor(modal)) => match code {
                KeyCode::Up => modal.select_prev(),
                KeyCode::Down => modal.select_next(),
                KeyCode::Char('v') => modal.toggle_visible(),
                KeyCode::Char('e') => modal.toggle_editable(),
                KeyCode::Tab => modal.cycle_role(&index),
                _ => {}
            },
            None => {}
        }
    }

    fn open_action_modal(&mut self, action: Action) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let (Some(user), Some(module)) = (
            snapshot.users.get(self.row),
            snapshot.modules.get(self.col),
        ) else {
            return;
        };

        let index = PermissionIndex::build(snapshot);
        match ActionToggleModal::open(snapshot, &index, user.id, module.id, action) {
            Ok(modal) => self.modal = Some(Modal::ActionToggle(modal)),
            Err(WorkflowError::NoRoleAssigned) => {
                self.notice = Some(format!("{} has no assigned roles", user.name));
            }
        }
    }

    fn open_field_editor(&mut self) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let (Some(user), Some(module)) = (
            snapshot.users.get(self.row),
            snapshot.modules.get(self.col),
        ) else {
            return;
        };

        let index = PermissionIndex::build(snapshot);
        match FieldEditorModal::open(snapshot, &index, user.id, module.id) {
            Ok(modal) => self.modal = Some(Modal::FieldEditor(modal)),
            Err(WorkflowError::NoRoleAssigned) => {
                self.notice = Some(format!("{} has no assigned roles", user.name));
            }
        }
    }

    /// Apply/Save the open modal: plan from the current snapshot, then
    /// hand the plan to a background task.
    fn apply_modal(&mut self) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let index = PermissionIndex::build(snapshot);
        let plan = match &self.modal {
            Some(Modal::ActionToggle(modal)) => modal.plan(&index),
            Some(Modal::FieldEditor(modal)) => vec![modal.plan(&index)],
            None => return,
        };
        self.spawn_sync(plan);
    }

    /// Run planned permission changes, then reload everything. The modal
    /// closes when the reload lands.
    fn spawn_sync(&mut self, plan: Vec<PermissionChange>) {
        self.syncing = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            workflows::execute(&client, plan).await;
            let result = Snapshot::load(&client).await;
            let _ = tx.send(AppMsg::SnapshotLoaded(result)).await;
        });
    }

    /// Toggle the user-role link under the cursor.
    fn toggle_role_cell(&mut self) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };
        let (Some(user), Some(role)) =
            (snapshot.users.get(self.row), snapshot.roles.get(self.col))
        else {
            return;
        };

        let change = role_assign::plan_toggle(snapshot, user.id, role.id);
        self.syncing = true;
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(edit) = role_assign::execute(&client, change).await {
                let _ = tx.send(AppMsg::LinkEdited(edit)).await;
            }
            let result = Snapshot::load(&client).await;
            let _ = tx.send(AppMsg::SnapshotLoaded(result)).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_client::ClientConfig;
    use shared::{Module, Role, User, UserRole};

    fn app() -> App {
        let (tx, _rx) = mpsc::channel(16);
        App::new(ClientConfig::default().build_http_client(), tx)
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            users: vec![
                User {
                    id: 1,
                    name: "u1".to_string(),
                },
                User {
                    id: 2,
                    name: "loner".to_string(),
                },
            ],
            roles: vec![Role {
                id: 2,
                name: "Editor".to_string(),
            }],
            modules: vec![Module {
                id: 5,
                name: "Invoices".to_string(),
                fields: Default::default(),
            }],
            user_roles: vec![UserRole {
                id: 10,
                user_id: 1,
                role_id: 2,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert_eq!(app.handle_key(KeyCode::Char('q')), Signal::Quit);
        assert_eq!(app.handle_key(KeyCode::Esc), Signal::Quit);
    }

    #[test]
    fn tab_switches_views() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.view, View::Roles);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.view, View::Matrix);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = app();
        app.snapshot = Some(snapshot());
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.row, 1); // two users
        app.handle_key(KeyCode::Right);
        assert_eq!(app.col, 0); // single module
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Up);
        assert_eq!(app.row, 0);
    }

    #[test]
    fn zero_role_user_gets_a_blocking_notice() {
        let mut app = app();
        app.snapshot = Some(snapshot());
        app.handle_key(KeyCode::Down); // cursor on "loner"
        app.handle_key(KeyCode::Char('r'));
        assert!(app.modal.is_none());
        assert!(app.notice.is_some());

        // the notice swallows everything except dismissal
        app.handle_key(KeyCode::Char('r'));
        assert!(app.notice.is_some());
        app.handle_key(KeyCode::Esc);
        assert!(app.notice.is_none());
    }

    #[test]
    fn action_key_opens_the_modal() {
        let mut app = app();
        app.snapshot = Some(snapshot());
        app.handle_key(KeyCode::Char('c'));
        let Some(Modal::ActionToggle(modal)) = &app.modal else {
            panic!("expected the action-toggle modal");
        };
        assert_eq!(modal.action, Action::Create);
        assert_eq!(modal.choices.len(), 1);

        // cancel discards with no network phase
        app.handle_key(KeyCode::Esc);
        assert!(app.modal.is_none());
        assert!(!app.syncing);
    }

    #[test]
    fn field_key_opens_the_editor() {
        let mut app = app();
        app.snapshot = Some(snapshot());
        app.handle_key(KeyCode::Char('f'));
        assert!(matches!(app.modal, Some(Modal::FieldEditor(_))));
    }

    #[test]
    fn snapshot_reload_closes_a_syncing_modal() {
        let mut app = app();
        app.snapshot = Some(snapshot());
        app.handle_key(KeyCode::Char('c'));
        app.syncing = true;
        app.handle_msg(AppMsg::SnapshotLoaded(Ok(snapshot())));
        assert!(app.modal.is_none());
        assert!(!app.syncing);
    }

    #[test]
    fn link_edits_patch_the_snapshot() {
        let mut app = app();
        app.snapshot = Some(snapshot());
        app.handle_msg(AppMsg::LinkEdited(LinkEdit::Removed(10)));
        assert!(app.snapshot.as_ref().unwrap().user_roles.is_empty());

        app.handle_msg(AppMsg::LinkEdited(LinkEdit::Created(UserRole {
            id: 11,
            user_id: 2,
            role_id: 2,
        })));
        assert_eq!(app.snapshot.as_ref().unwrap().user_roles.len(), 1);
    }
}
