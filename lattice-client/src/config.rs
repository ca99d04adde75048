//! Client configuration

/// Default directory service address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Environment variable overriding the directory service address
pub const BASE_URL_ENV: &str = "LATTICE_API_URL";

/// Client configuration for connecting to the directory service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
        }
    }

    /// Read the base URL from `LATTICE_API_URL`, falling back to the default
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> super::HttpClient {
        super::HttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, 30);
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new("http://10.0.0.5:9000").with_timeout(5);
        assert_eq!(config.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.timeout, 5);
    }
}
