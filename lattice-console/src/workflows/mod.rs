//! Edit workflows
//!
//! Each workflow stages local edits, then on apply issues one network
//! call per affected row. Calls run sequentially in selection order;
//! per-item failures are logged and never abort the remaining items.
//! Every completed workflow is followed by a full snapshot reload.

pub mod action_toggle;
pub mod field_editor;
pub mod role_assign;

pub use action_toggle::ActionToggleModal;
pub use field_editor::FieldEditorModal;
pub use role_assign::LinkEdit;

use lattice_client::HttpClient;
use shared::{Permission, PermissionCreate};
use thiserror::Error;

/// Workflow precondition failures surfaced as blocking notices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// The user has no assigned roles
    #[error("user has no assigned roles")]
    NoRoleAssigned,
}

/// A single planned mutation against the permissions collection.
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionChange {
    /// POST a new row
    Create(PermissionCreate),
    /// PUT a full-row rewrite
    Update(Permission),
}

impl PermissionChange {
    fn describe(&self) -> (i64, i64) {
        match self {
            PermissionChange::Create(p) => (p.role_id, p.module_id),
            PermissionChange::Update(p) => (p.role_id, p.module_id),
        }
    }
}

/// Execute planned permission changes sequentially, best-effort.
pub async fn execute(client: &HttpClient, plan: Vec<PermissionChange>) {
    for change in plan {
        let (role_id, module_id) = change.describe();
        let result = match &change {
            PermissionChange::Create(payload) => client.create_permission(payload).await,
            PermissionChange::Update(row) => client.update_permission(row).await,
        };
        if let Err(e) = result {
            tracing::warn!(
                "permission sync failed for role {} module {}: {}",
                role_id,
                module_id,
                e
            );
        }
    }
}
