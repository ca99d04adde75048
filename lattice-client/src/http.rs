//! HTTP client for the directory API
//!
//! Reads go through `get` and unwrap the `{ "data": [...] }` envelope;
//! mutations use the typed calls at the bottom. No retries, no auth
//! headers, no request deduplication.

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{
    ApiResponse, Module, Permission, PermissionCreate, Role, User, UserRole, UserRoleCreate,
};

/// HTTP client for making network requests to the directory service
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// The configured base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body, ignoring the response payload
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Make a PUT request with JSON body, ignoring the response payload
    pub async fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        let url = self.url(path);
        tracing::debug!("PUT {}", url);
        let response = self.client.put(url).json(body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let url = self.url(path);
        tracing::debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Fail on a non-success status, carrying the body for context
    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(Into::into)
    }

    // ========== Directory API ==========

    /// List all users
    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get::<ApiResponse<Vec<User>>>("/api/user/")
            .await
            .map(ApiResponse::into_list)
    }

    /// List all roles
    pub async fn list_roles(&self) -> ClientResult<Vec<Role>> {
        self.get::<ApiResponse<Vec<Role>>>("/api/role/")
            .await
            .map(ApiResponse::into_list)
    }

    /// List all modules
    pub async fn list_modules(&self) -> ClientResult<Vec<Module>> {
        self.get::<ApiResponse<Vec<Module>>>("/api/module/")
            .await
            .map(ApiResponse::into_list)
    }

    /// List all permission rows
    pub async fn list_permissions(&self) -> ClientResult<Vec<Permission>> {
        self.get::<ApiResponse<Vec<Permission>>>("/api/permissions/")
            .await
            .map(ApiResponse::into_list)
    }

    /// List all user-role links
    pub async fn list_user_roles(&self) -> ClientResult<Vec<UserRole>> {
        self.get::<ApiResponse<Vec<UserRole>>>("/api/userRole/")
            .await
            .map(ApiResponse::into_list)
    }

    /// Create a permission row
    pub async fn create_permission(&self, payload: &PermissionCreate) -> ClientResult<()> {
        self.post_unit("/api/permissions", payload).await
    }

    /// Replace a permission row (full-record rewrite)
    pub async fn update_permission(&self, permission: &Permission) -> ClientResult<()> {
        self.put_unit(&format!("/api/permissions/{}", permission.id), permission)
            .await
    }

    /// Create a user-role link, returning the server-assigned record
    pub async fn create_user_role(&self, payload: &UserRoleCreate) -> ClientResult<UserRole> {
        self.post::<ApiResponse<UserRole>, _>("/api/userRole", payload)
            .await?
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing user-role data".to_string()))
    }

    /// Remove a user-role link by its server-assigned id
    pub async fn delete_user_role(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/api/userRole/{}", id)).await
    }
}
