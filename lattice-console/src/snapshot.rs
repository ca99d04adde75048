//! In-memory snapshot of the directory dataset
//!
//! The five collections form a single consistency unit: any completed
//! mutation invalidates the whole snapshot and triggers a full reload,
//! never an incremental patch. The only exception is the role-assignment
//! toggle's optimistic local edit, which is itself followed by a reload.

use lattice_client::{ClientResult, HttpClient};
use shared::{Module, Permission, Role, User, UserRole};

/// Snapshot of the five directory collections.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub modules: Vec<Module>,
    pub permissions: Vec<Permission>,
    pub user_roles: Vec<UserRole>,
}

impl Snapshot {
    /// Fetch all five collections concurrently.
    ///
    /// All-or-nothing: the first failure propagates and no partial
    /// snapshot is produced.
    pub async fn load(client: &HttpClient) -> ClientResult<Self> {
        let (users, roles, modules, permissions, user_roles) = tokio::try_join!(
            client.list_users(),
            client.list_roles(),
            client.list_modules(),
            client.list_permissions(),
            client.list_user_roles(),
        )?;

        Ok(Self {
            users,
            roles,
            modules,
            permissions,
            user_roles,
        })
    }

    /// Role name for display; falls back to the raw id for dangling links.
    pub fn role_name(&self, role_id: i64) -> String {
        self.roles
            .iter()
            .find(|r| r.id == role_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| format!("role {}", role_id))
    }

    /// Module record by id.
    pub fn module(&self, module_id: i64) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// First link for a (user, role) pair, if any.
    pub fn find_link(&self, user_id: i64, role_id: i64) -> Option<&UserRole> {
        self.user_roles
            .iter()
            .find(|l| l.user_id == user_id && l.role_id == role_id)
    }
}
