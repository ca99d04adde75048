//! Action-toggle workflow
//!
//! Opened from an action cell in the permissions matrix: the operator
//! picks which of the user's roles gain or lose that action for the
//! module. Apply reconciles each role independently: create a new row,
//! rewrite the existing one with a diffed action list, or do nothing.

use shared::{Action, Permission, PermissionCreate};

use super::{PermissionChange, WorkflowError};
use crate::resolver::{self, PermissionIndex};
use crate::snapshot::Snapshot;

/// One checkbox per user-role in the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChoice {
    pub role_id: i64,
    pub role_name: String,
    /// Whether the role granted the action when the modal opened
    pub granted: bool,
    /// Staged checkbox state
    pub enabled: bool,
}

/// Open modal state for one (user, module, action) cell.
#[derive(Debug, Clone)]
pub struct ActionToggleModal {
    pub user_id: i64,
    pub module_id: i64,
    pub action: Action,
    pub choices: Vec<RoleChoice>,
    pub selected: usize,
}

impl ActionToggleModal {
    /// Seed the modal from the current snapshot.
    ///
    /// Fails when the user has no assigned roles; in that case nothing
    /// opens and no network call is made.
    pub fn open(
        snapshot: &Snapshot,
        index: &PermissionIndex,
        user_id: i64,
        module_id: i64,
        action: Action,
    ) -> Result<Self, WorkflowError> {
        let role_ids = resolver::user_role_ids(snapshot, user_id);
        if role_ids.is_empty() {
            return Err(WorkflowError::NoRoleAssigned);
        }

        let choices = role_ids
            .into_iter()
            .map(|role_id| {
                let granted = index
                    .get(role_id, module_id)
                    .is_some_and(|p| p.grants(action));
                RoleChoice {
                    role_id,
                    role_name: snapshot.role_name(role_id),
                    granted,
                    enabled: granted,
                }
            })
            .collect();

        Ok(Self {
            user_id,
            module_id,
            action,
            choices,
            selected: 0,
        })
    }

    /// Move the highlight up.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the highlight down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.choices.len() {
            self.selected += 1;
        }
    }

    /// Flip the staged checkbox for the highlighted role.
    pub fn toggle_selected(&mut self) {
        if let Some(choice) = self.choices.get_mut(self.selected) {
            choice.enabled = !choice.enabled;
        }
    }

    /// Plan the create/update calls for the staged selection.
    ///
    /// Per role: no existing row and the box is enabled → create a row
    /// with just this action and empty field lists; existing row → full
    /// rewrite with the action diffed in or out, other actions and both
    /// field lists untouched; unchanged rows are skipped.
    pub fn plan(&self, index: &PermissionIndex) -> Vec<PermissionChange> {
        let mut changes = Vec::new();
        for choice in &self.choices {
            match index.get(choice.role_id, self.module_id) {
                None => {
                    if choice.enabled {
                        changes.push(PermissionChange::Create(PermissionCreate::single_action(
                            choice.role_id,
                            self.module_id,
                            self.action,
                        )));
                    }
                }
                Some(existing) => {
                    let actions = if choice.enabled {
                        existing.with_action(self.action)
                    } else {
                        existing.without_action(self.action)
                    };
                    if actions != existing.actions {
                        changes.push(PermissionChange::Update(Permission {
                            actions,
                            ..existing.clone()
                        }));
                    }
                }
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Role, User, UserRole};

    fn snapshot() -> Snapshot {
        // U1 has role Editor (2); module Invoices is 5
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
            user_roles: vec![UserRole {
                id: 10,
                user_id: 1,
                role_id: 2,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn open_fails_without_roles() {
        let snapshot = Snapshot::default();
        let index = PermissionIndex::build(&snapshot);
        let result = ActionToggleModal::open(&snapshot, &index, 1, 5, Action::Read);
        assert_eq!(result.unwrap_err(), WorkflowError::NoRoleAssigned);
    }

    #[test]
    fn open_seeds_one_checkbox_per_role() {
        let mut snapshot = snapshot();
        snapshot.user_roles.push(UserRole {
            id: 11,
            user_id: 1,
            role_id: 3,
        });
        snapshot.permissions.push(Permission {
            id: 100,
            role_id: 2,
            module_id: 5,
            actions: vec![Action::Read],
            visible_fields: Vec::new(),
            editable_fields: Vec::new(),
        });

        let index = PermissionIndex::build(&snapshot);
        let modal = ActionToggleModal::open(&snapshot, &index, 1, 5, Action::Read).unwrap();
        assert_eq!(modal.choices.len(), 2);
        assert!(modal.choices[0].granted && modal.choices[0].enabled);
        assert!(!modal.choices[1].granted && !modal.choices[1].enabled);
        assert_eq!(modal.choices[0].role_name, "Editor");
    }

    #[test]
    fn enabling_without_existing_row_plans_a_single_create() {
        // Operator checks "create" for U1/Invoices, selects Editor, applies
        let snapshot = snapshot();
        let index = PermissionIndex::build(&snapshot);
        let mut modal = ActionToggleModal::open(&snapshot, &index, 1, 5, Action::Create).unwrap();
        modal.toggle_selected();

        let plan = modal.plan(&index);
        assert_eq!(
            plan,
            vec![PermissionChange::Create(PermissionCreate {
                role_id: 2,
                module_id: 5,
                actions: vec![Action::Create],
                visible_fields: Vec::new(),
                editable_fields: Vec::new(),
            })]
        );
    }

    #[test]
    fn disabling_without_existing_row_plans_nothing() {
        let snapshot = snapshot();
        let index = PermissionIndex::build(&snapshot);
        let modal = ActionToggleModal::open(&snapshot, &index, 1, 5, Action::Delete).unwrap();
        assert!(modal.plan(&index).is_empty());
    }

    #[test]
    fn update_preserves_other_actions_and_fields() {
        let mut snapshot = snapshot();
        snapshot.permissions.push(Permission {
            id: 100,
            role_id: 2,
            module_id: 5,
            actions: vec![Action::Read, Action::Update],
            visible_fields: vec!["amount".to_string()],
            editable_fields: vec!["amount".to_string()],
        });

        let index = PermissionIndex::build(&snapshot);
        let mut modal = ActionToggleModal::open(&snapshot, &index, 1, 5, Action::Delete).unwrap();
        modal.toggle_selected();

        let plan = modal.plan(&index);
        let PermissionChange::Update(row) = &plan[0] else {
            panic!("expected an update");
        };
        assert_eq!(row.id, 100);
        assert_eq!(row.actions, vec![Action::Read, Action::Update, Action::Delete]);
        assert_eq!(row.visible_fields, vec!["amount"]);
        assert_eq!(row.editable_fields, vec!["amount"]);
    }

    #[test]
    fn unchanged_selection_plans_nothing() {
        // Idempotence: a selection matching the current grants is a no-op
        let mut snapshot = snapshot();
        snapshot.permissions.push(Permission {
            id: 100,
            role_id: 2,
            module_id: 5,
            actions: vec![Action::Read],
            visible_fields: Vec::new(),
            editable_fields: Vec::new(),
        });

        let index = PermissionIndex::build(&snapshot);
        let modal = ActionToggleModal::open(&snapshot, &index, 1, 5, Action::Read).unwrap();
        assert!(modal.plan(&index).is_empty());
    }

    #[test]
    fn disabling_an_existing_grant_plans_the_removal() {
        let mut snapshot = snapshot();
        snapshot.permissions.push(Permission {
            id: 100,
            role_id: 2,
            module_id: 5,
            actions: vec![Action::Read, Action::Create],
            visible_fields: Vec::new(),
            editable_fields: Vec::new(),
        });

        let index = PermissionIndex::build(&snapshot);
        let mut modal = ActionToggleModal::open(&snapshot, &index, 1, 5, Action::Create).unwrap();
        modal.toggle_selected();

        let plan = modal.plan(&index);
        let PermissionChange::Update(row) = &plan[0] else {
            panic!("expected an update");
        };
        assert_eq!(row.actions, vec![Action::Read]);
    }
}
