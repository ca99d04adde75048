// lattice-client/tests/client_integration.rs

use lattice_client::{ApiResponse, ClientConfig, UserRole};

#[tokio::test]
async fn test_client_creation() {
    let config = ClientConfig::new("http://localhost:8080").with_timeout(5);
    let client = config.build_http_client();
    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[tokio::test]
async fn test_default_config() {
    let config = ClientConfig::default();
    assert_eq!(config.base_url, lattice_client::DEFAULT_BASE_URL);
}

#[test]
fn test_user_role_envelope_shape() {
    // POST /api/userRole answers with the created record under `data`
    let raw = r#"{"data":{"id":42,"userId":1,"roleId":2}}"#;
    let envelope: ApiResponse<UserRole> = serde_json::from_str(raw).unwrap();
    let link = envelope.data.unwrap();
    assert_eq!(link.id, 42);
    assert_eq!(link.user_id, 1);
    assert_eq!(link.role_id, 2);
}
