//! Field-editor workflow
//!
//! Edits the visible/editable field lists of one role/module permission
//! row. The draft applies to a single role at a time; the operator can
//! cycle through the user's roles, and the default is the first role
//! that already has a row for the module (falling back to the first
//! link), so multi-role users edit the row they most likely mean.

use shared::{Permission, PermissionCreate};

use super::{PermissionChange, WorkflowError};
use crate::resolver::{self, PermissionIndex};
use crate::snapshot::Snapshot;

/// A selectable role in the editor header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOption {
    pub role_id: i64,
    pub role_name: String,
}

/// Open editor state for one (user, module) cell.
#[derive(Debug, Clone)]
pub struct FieldEditorModal {
    pub user_id: i64,
    pub module_id: i64,
    pub module_name: String,
    /// The user's roles; the draft applies to the active one
    pub roles: Vec<RoleOption>,
    pub active_role: usize,
    /// The module's declared field universe
    pub fields: Vec<String>,
    /// Draft visible set (independent of editable; no subset rule)
    pub visible: Vec<String>,
    /// Draft editable set
    pub editable: Vec<String>,
    pub selected: usize,
}

impl FieldEditorModal {
    /// Seed the editor from the current snapshot.
    ///
    /// Fails when the user has no assigned roles. The field universe is
    /// the module's normalized field list; a module with an unparsable
    /// list opens with an empty universe.
    pub fn open(
        snapshot: &Snapshot,
        index: &PermissionIndex,
        user_id: i64,
        module_id: i64,
    ) -> Result<Self, WorkflowError> {
        let role_ids = resolver::user_role_ids(snapshot, user_id);
        if role_ids.is_empty() {
            return Err(WorkflowError::NoRoleAssigned);
        }

        let active_role = role_ids
            .iter()
            .position(|&role_id| index.get(role_id, module_id).is_some())
            .unwrap_or(0);

        let roles = role_ids
            .into_iter()
            .map(|role_id| RoleOption {
                role_id,
                role_name: snapshot.role_name(role_id),
            })
            .collect();

        let (module_name, fields) = match snapshot.module(module_id) {
            Some(module) => (module.name.clone(), module.fields.names()),
            None => (format!("module {}", module_id), Vec::new()),
        };

        let mut modal = Self {
            user_id,
            module_id,
            module_name,
            roles,
            active_role,
            fields,
            visible: Vec::new(),
            editable: Vec::new(),
            selected: 0,
        };
        modal.load_draft(index);
        Ok(modal)
    }

    /// Role the draft currently applies to.
    pub fn role_id(&self) -> i64 {
        self.roles[self.active_role].role_id
    }

    /// Display name of the active role.
    pub fn role_name(&self) -> &str {
        &self.roles[self.active_role].role_name
    }

    /// Switch the draft to the next of the user's roles, discarding
    /// unsaved toggles for the previous one.
    pub fn cycle_role(&mut self, index: &PermissionIndex) {
        self.active_role = (self.active_role + 1) % self.roles.len();
        self.load_draft(index);
    }

    fn load_draft(&mut self, index: &PermissionIndex) {
        match index.get(self.role_id(), self.module_id) {
            Some(permission) => {
                self.visible = permission.visible_fields.clone();
                self.editable = permission.editable_fields.clone();
            }
            None => {
                self.visible = Vec::new();
                self.editable = Vec::new();
            }
        }
    }

    /// Move the highlight up.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the highlight down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.fields.len() {
            self.selected += 1;
        }
    }

    /// Flip the highlighted field in the visible set.
    pub fn toggle_visible(&mut self) {
        if let Some(field) = self.fields.get(self.selected) {
            Self::toggle(&mut self.visible, field);
        }
    }

    /// Flip the highlighted field in the editable set.
    pub fn toggle_editable(&mut self) {
        if let Some(field) = self.fields.get(self.selected) {
            Self::toggle(&mut self.editable, field);
        }
    }

    fn toggle(set: &mut Vec<String>, field: &str) {
        match set.iter().position(|f| f == field) {
            Some(i) => {
                set.remove(i);
            }
            None => set.push(field.to_string()),
        }
    }

    /// Whether the field is in the draft visible set.
    pub fn is_visible(&self, field: &str) -> bool {
        self.visible.iter().any(|f| f == field)
    }

    /// Whether the field is in the draft editable set.
    pub fn is_editable(&self, field: &str) -> bool {
        self.editable.iter().any(|f| f == field)
    }

    /// Plan the save call: rewrite the existing row with the draft field
    /// sets (actions preserved), or create a new row with empty actions.
    pub fn plan(&self, index: &PermissionIndex) -> PermissionChange {
        match index.get(self.role_id(), self.module_id) {
            Some(existing) => PermissionChange::Update(Permission {
                visible_fields: self.visible.clone(),
                editable_fields: self.editable.clone(),
                ..existing.clone()
            }),
            None => PermissionChange::Create(PermissionCreate::fields_only(
                self.role_id(),
                self.module_id,
                self.visible.clone(),
                self.editable.clone(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Action, FieldList, Module, Role, User, UserRole};

    fn snapshot() -> Snapshot {
        // U1 has Editor (2) and Viewer (3); module Invoices (5) declares
        // two fields; only Viewer has an existing row for it
        Snapshot {
            users: vec![User {
                id: 1,
                name: "u1".to_string(),
            }],
            roles: vec![
                Role {
                    id: 2,
                    name: "Editor".to_string(),
                },
                Role {
                    id: 3,
                    name: "Viewer".to_string(),
                },
            ],
            modules: vec![Module {
                id: 5,
                name: "Invoices".to_string(),
                fields: FieldList::Parsed(vec!["amount".to_string(), "date".to_string()]),
            }],
            user_roles: vec![
                UserRole {
                    id: 10,
                    user_id: 1,
                    role_id: 2,
                },
                UserRole {
                    id: 11,
                    user_id: 1,
                    role_id: 3,
                },
            ],
            permissions: vec![Permission {
                id: 100,
                role_id: 3,
                module_id: 5,
                actions: vec![Action::Read],
                visible_fields: vec!["date".to_string()],
                editable_fields: Vec::new(),
            }],
        }
    }

    #[test]
    fn open_fails_without_roles() {
        let snapshot = Snapshot::default();
        let index = PermissionIndex::build(&snapshot);
        let result = FieldEditorModal::open(&snapshot, &index, 1, 5);
        assert_eq!(result.unwrap_err(), WorkflowError::NoRoleAssigned);
    }

    #[test]
    fn open_prefers_the_role_with_an_existing_row() {
        let snapshot = snapshot();
        let index = PermissionIndex::build(&snapshot);
        let modal = FieldEditorModal::open(&snapshot, &index, 1, 5).unwrap();
        assert_eq!(modal.role_id(), 3);
        assert_eq!(modal.role_name(), "Viewer");
        assert_eq!(modal.fields, vec!["amount", "date"]);
        assert_eq!(modal.visible, vec!["date"]);
        assert!(modal.editable.is_empty());
    }

    #[test]
    fn open_falls_back_to_the_first_link() {
        let mut snapshot = snapshot();
        snapshot.permissions.clear();
        let index = PermissionIndex::build(&snapshot);
        let modal = FieldEditorModal::open(&snapshot, &index, 1, 5).unwrap();
        assert_eq!(modal.role_id(), 2);
        assert!(modal.visible.is_empty());
    }

    #[test]
    fn cycling_roles_reloads_the_draft() {
        let snapshot = snapshot();
        let index = PermissionIndex::build(&snapshot);
        let mut modal = FieldEditorModal::open(&snapshot, &index, 1, 5).unwrap();
        modal.cycle_role(&index);
        assert_eq!(modal.role_id(), 2);
        assert!(modal.visible.is_empty());
        modal.cycle_role(&index);
        assert_eq!(modal.role_id(), 3);
        assert_eq!(modal.visible, vec!["date"]);
    }

    #[test]
    fn toggles_are_independent_sets() {
        let snapshot = snapshot();
        let index = PermissionIndex::build(&snapshot);
        let mut modal = FieldEditorModal::open(&snapshot, &index, 1, 5).unwrap();

        // "amount" into editable without being visible: allowed
        modal.toggle_editable();
        assert!(modal.is_editable("amount"));
        assert!(!modal.is_visible("amount"));

        modal.toggle_editable();
        assert!(!modal.is_editable("amount"));
    }

    #[test]
    fn save_rewrites_the_existing_row_and_preserves_actions() {
        let snapshot = snapshot();
        let index = PermissionIndex::build(&snapshot);
        let mut modal = FieldEditorModal::open(&snapshot, &index, 1, 5).unwrap();
        modal.toggle_visible(); // add "amount"

        let PermissionChange::Update(row) = modal.plan(&index) else {
            panic!("expected an update");
        };
        assert_eq!(row.id, 100);
        assert_eq!(row.actions, vec![Action::Read]);
        assert_eq!(row.visible_fields, vec!["date", "amount"]);
    }

    #[test]
    fn save_without_existing_row_creates_with_empty_actions() {
        let snapshot = snapshot();
        let index = PermissionIndex::build(&snapshot);
        let mut modal = FieldEditorModal::open(&snapshot, &index, 1, 5).unwrap();
        modal.cycle_role(&index); // Editor, no row
        modal.toggle_visible();

        let PermissionChange::Create(payload) = modal.plan(&index) else {
            panic!("expected a create");
        };
        assert_eq!(payload.role_id, 2);
        assert!(payload.actions.is_empty());
        assert_eq!(payload.visible_fields, vec!["amount"]);
    }
}
