//! User Model

use serde::{Deserialize, Serialize};

/// User entity
///
/// Read-only from the console's perspective; users are managed elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}
