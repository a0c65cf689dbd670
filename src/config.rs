use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Runtime configuration, merged from defaults and `K9_`-prefixed
/// environment variables (e.g. `K9_DATABASE_URL`, `K9_GOOGLE__CLIENT_ID`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub loglevel: String,
    pub jwt_secret: String,
    /// Access-token lifetime for issued bearer tokens, in seconds.
    pub token_ttl_secs: i64,
    pub google: GoogleOauthConfig,
}

/// Provider endpoint/app identity handed explicitly to the OAuth flow and
/// the sync engine. No process-wide singleton: tests swap in fake endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOauthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub redirect_uri: String,
    pub calendar_api_base: String,
    pub scopes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:k9hub.sqlite".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            jwt_secret: String::new(),
            token_ttl_secs: 3600,
            google: GoogleOauthConfig::default(),
        }
    }
}

impl Default for GoogleOauthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            redirect_uri: "http://127.0.0.1:5173/auth/google/callback".to_string(),
            calendar_api_base: "https://www.googleapis.com/calendar/v3".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/calendar.readonly".to_string(),
                "https://www.googleapis.com/auth/calendar.events".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration: serde defaults, overridden by the environment.
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("K9_").split("__"))
            .extract()
    }
}
