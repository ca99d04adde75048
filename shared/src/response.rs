//! API Response types
//!
//! The remote directory API wraps every payload in a `data` envelope:
//!
//! ```json
//! { "data": [ ... ] }
//! ```

use serde::{Deserialize, Serialize};

/// Response envelope around a payload of type `T`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Wrapped payload (absent on some responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload.
    pub fn ok(data: T) -> Self {
        Self { data: Some(data) }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Unwrap a list payload, treating a missing `data` field as empty.
    pub fn into_list(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}
