use crate::config::GoogleOauthConfig;
use chrono::{DateTime, Duration, Utc};
use oauth2::TokenResponse;
use oauth2::basic::BasicTokenResponse;
use serde::{Deserialize, Serialize};

/// The OAuth token bundle for one user's link to Google: tokens, expiry,
/// and the endpoint/client identity needed to refresh later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CredentialSet {
    pub access_token: String,
    /// Absent on re-authorization flows where Google chooses not to resend
    /// the long-lived token.
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
}

impl CredentialSet {
    /// Extract a credential set from a token response, carrying over the
    /// provider identity the exchange was performed with. Scopes default to
    /// the requested set when the provider echoes none back.
    pub fn from_token_response(
        token: &BasicTokenResponse,
        config: &GoogleOauthConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_in = token
            .expires_in()
            .map(|d| Duration::seconds(d.as_secs() as i64))
            .unwrap_or_else(|| Duration::seconds(3600));
        let scopes = token
            .scopes()
            .map(|s| s.iter().map(|scope| scope.to_string()).collect())
            .unwrap_or_else(|| config.scopes.clone());

        Self {
            access_token: token.access_token().secret().clone(),
            refresh_token: token.refresh_token().map(|t| t.secret().clone()),
            expires_at: now + expires_in,
            token_uri: config.token_uri.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            scopes,
        }
    }

    /// Granted scopes as stored: space-delimited, order irrelevant.
    pub fn scopes_string(&self) -> String {
        self.scopes.join(" ")
    }
}
