use catalyst_client::config::ClientConfig;
use pretty_assertions::assert_eq;
use std::time::Duration;
use uuid::Uuid;

#[test]
fn test_defaults() {
    let user_id = Uuid::new_v4();
    let config = ClientConfig::new("http://localhost:3000/", user_id);

    assert_eq!(config.api_url, "http://localhost:3000");
    assert_eq!(config.user_id, user_id);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.cache_ttl(), chrono::Duration::minutes(5));
    assert_eq!(config.url("/api/profile"), "http://localhost:3000/api/profile");
}

#[test]
fn test_from_env() {
    let user_id = Uuid::new_v4();

    // Only this test touches these variables.
    unsafe {
        std::env::set_var("CATALYST_API_URL", "https://catalyst.example.edu");
        std::env::set_var("CATALYST_USER_ID", user_id.to_string());
        std::env::set_var("CATALYST_REQUEST_TIMEOUT_SECONDS", "5");
        std::env::remove_var("CATALYST_CACHE_TTL_SECONDS");
    }

    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.api_url, "https://catalyst.example.edu");
    assert_eq!(config.user_id, user_id);
    assert_eq!(config.request_timeout_seconds, 5);
    assert_eq!(config.cache_ttl_seconds, 300);

    unsafe {
        std::env::set_var("CATALYST_USER_ID", "not-a-uuid");
    }
    assert!(ClientConfig::from_env().is_err());
}
