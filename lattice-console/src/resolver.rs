//! Permission resolution
//!
//! Pure, synchronous functions computing effective grants from a
//! snapshot. A user's capabilities are always derived — the OR/union of
//! their roles' permission rows — and never stored.

use std::collections::HashMap;

use shared::{Action, Permission};

use crate::snapshot::Snapshot;

/// Index from (role_id, module_id) to the matching permission row.
///
/// The pair is assumed unique in the server dataset; the last-seen row
/// wins if duplicates exist.
pub struct PermissionIndex<'a> {
    by_role_module: HashMap<(i64, i64), &'a Permission>,
}

impl<'a> PermissionIndex<'a> {
    /// Build the index in one pass over the snapshot's permissions.
    pub fn build(snapshot: &'a Snapshot) -> Self {
        let mut by_role_module = HashMap::with_capacity(snapshot.permissions.len());
        for permission in &snapshot.permissions {
            by_role_module.insert((permission.role_id, permission.module_id), permission);
        }
        Self { by_role_module }
    }

    /// Permission row for a (role, module) pair, if any.
    pub fn get(&self, role_id: i64, module_id: i64) -> Option<&'a Permission> {
        self.by_role_module.get(&(role_id, module_id)).copied()
    }
}

/// Role ids linked to the user, in link order.
pub fn user_role_ids(snapshot: &Snapshot, user_id: i64) -> Vec<i64> {
    snapshot
        .user_roles
        .iter()
        .filter(|l| l.user_id == user_id)
        .map(|l| l.role_id)
        .collect()
}

/// Whether any of the user's roles grants `action` for the module.
///
/// Short-circuits on the first matching role; false for users with no
/// roles.
pub fn user_has_action(
    snapshot: &Snapshot,
    index: &PermissionIndex,
    user_id: i64,
    module_id: i64,
    action: Action,
) -> bool {
    snapshot
        .user_roles
        .iter()
        .filter(|l| l.user_id == user_id)
        .any(|l| {
            index
                .get(l.role_id, module_id)
                .is_some_and(|p| p.grants(action))
        })
}

/// Effective field visibility for one user and module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUnion {
    pub visible: Vec<String>,
    pub editable: Vec<String>,
}

/// Union of visible/editable fields across the user's role-permissions
/// for the module, in first-seen order.
pub fn union_fields(
    snapshot: &Snapshot,
    index: &PermissionIndex,
    user_id: i64,
    module_id: i64,
) -> FieldUnion {
    let mut union = FieldUnion::default();
    for link in snapshot.user_roles.iter().filter(|l| l.user_id == user_id) {
        let Some(permission) = index.get(link.role_id, module_id) else {
            continue;
        };
        for field in &permission.visible_fields {
            if !union.visible.contains(field) {
                union.visible.push(field.clone());
            }
        }
        for field in &permission.editable_fields {
            if !union.editable.contains(field) {
                union.editable.push(field.clone());
            }
        }
    }
    union
}
