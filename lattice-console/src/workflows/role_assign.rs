//! Role-assignment workflow
//!
//! Binary toggle per (user, role) cell in the assignment grid. No
//! confirmation, no undo; the caller reloads the snapshot afterwards
//! because role changes ripple into derived permissions elsewhere.

use lattice_client::HttpClient;
use shared::{UserRole, UserRoleCreate};

use crate::snapshot::Snapshot;

/// Planned link mutation for a (user, role) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkChange {
    /// Remove an existing link by its server-assigned id
    Remove { link_id: i64 },
    /// Create the missing link
    Add(UserRoleCreate),
}

/// Local snapshot edit to apply once the server call succeeds.
#[derive(Debug)]
pub enum LinkEdit {
    Removed(i64),
    Created(UserRole),
}

/// Decide the toggle direction from the current snapshot.
pub fn plan_toggle(snapshot: &Snapshot, user_id: i64, role_id: i64) -> LinkChange {
    match snapshot.find_link(user_id, role_id) {
        Some(link) => LinkChange::Remove { link_id: link.id },
        None => LinkChange::Add(UserRoleCreate { user_id, role_id }),
    }
}

/// Execute the toggle, best-effort.
///
/// Returns the optimistic local edit for the caller to apply ahead of
/// the full reload; a failed call is logged and yields no edit.
pub async fn execute(client: &HttpClient, change: LinkChange) -> Option<LinkEdit> {
    match change {
        LinkChange::Remove { link_id } => match client.delete_user_role(link_id).await {
            Ok(()) => Some(LinkEdit::Removed(link_id)),
            Err(e) => {
                tracing::warn!("failed to remove user-role link {}: {}", link_id, e);
                None
            }
        },
        LinkChange::Add(payload) => match client.create_user_role(&payload).await {
            Ok(link) => Some(LinkEdit::Created(link)),
            Err(e) => {
                tracing::warn!(
                    "failed to link user {} to role {}: {}",
                    payload.user_id,
                    payload.role_id,
                    e
                );
                None
            }
        },
    }
}
