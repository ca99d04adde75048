//! Lattice Client - HTTP client for the RBAC directory API
//!
//! Provides network-based HTTP calls to the directory service holding
//! users, roles, modules, permissions and user-role links.

pub mod config;
pub mod error;
pub mod http;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;

// Re-export shared types for convenience
pub use shared::{
    ApiResponse, Module, Permission, PermissionCreate, Role, User, UserRole, UserRoleCreate,
};
