#![allow(dead_code)]

use k9_hub::config::{Config, GoogleOauthConfig};
use k9_hub::db::SqlitePool;
use k9_hub::db::models::User;
use k9_hub::middleware::auth::mint_access_token;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique temp-file SQLite URL per test, so parallel tests never share state.
pub fn temp_database(tag: &str) -> (PathBuf, String) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!("k9hub-{}-{}-{}.sqlite", tag, std::process::id(), nanos));
    let url = format!("sqlite:{}", temp_path.display());
    (temp_path, url)
}

pub async fn connect(url: &str) -> SqlitePool {
    k9_hub::db::connect(url)
        .await
        .expect("failed to open test database")
}

/// Config pointing the provider endpoints at a test server.
pub fn test_config(database_url: &str, provider_base: &str) -> Config {
    Config {
        database_url: database_url.to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        loglevel: "warn".to_string(),
        jwt_secret: "test-secret".to_string(),
        token_ttl_secs: 3600,
        google: GoogleOauthConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            auth_uri: format!("{provider_base}/o/oauth2/auth"),
            token_uri: format!("{provider_base}/token"),
            redirect_uri: "http://127.0.0.1:5173/auth/google/callback".to_string(),
            calendar_api_base: format!("{provider_base}/calendar/v3"),
            scopes: vec!["https://www.googleapis.com/auth/calendar.readonly".to_string()],
        },
    }
}

pub async fn seed_user(pool: &SqlitePool, email: &str) -> User {
    k9_hub::db::UsersStorage::new(pool.clone())
        .create(email, "not-a-real-hash", "Keith", "Hiamond", None, chrono::Utc::now())
        .await
        .expect("failed to seed user")
}

pub fn bearer_token(user: &User, config: &Config) -> String {
    mint_access_token(user, &config.jwt_secret, config.token_ttl_secs, chrono::Utc::now())
        .expect("failed to mint test token")
}
