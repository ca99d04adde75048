//! UserRole Model

use serde::{Deserialize, Serialize};

/// User-to-role link (many-to-many)
///
/// Uniqueness of the (user, role) pair is assumed, not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    pub id: i64,
    pub user_id: i64,
    pub role_id: i64,
}

/// Create link payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleCreate {
    pub user_id: i64,
    pub role_id: i64,
}
