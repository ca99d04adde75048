//! Shared types for the lattice console
//!
//! Domain entities mirroring the remote directory API records, plus the
//! response envelope the API wraps every payload in. Used by both the
//! HTTP client crate and the console.

pub mod models;
pub mod response;

// Re-exports
pub use models::{
    Action, FieldList, Module, Permission, PermissionCreate, Role, User, UserRole, UserRoleCreate,
};
pub use response::ApiResponse;
