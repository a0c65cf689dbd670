use crate::config::GoogleOauthConfig;
use crate::db::models::StoredCredential;
use crate::error::HubError;
use crate::google_oauth::credentials::CredentialSet;

use chrono::{DateTime, Duration, Utc};
use oauth2::{
    AuthUrl, AuthorizationCode, Client as OAuth2Client, ClientId, ClientSecret, CsrfToken,
    EndpointNotSet, EndpointSet, RedirectUrl, RefreshToken, Scope, StandardRevocableToken,
    TokenResponse, TokenUrl,
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenResponse,
    },
};
use tracing::info;
use url::Url;

/// OAuth2 client with authorization and token endpoints configured.
type GoogleOauth2Client = OAuth2Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Token-endpoint-only client used for refresh exchanges, built from the
/// endpoint metadata stored alongside the credential set.
type GoogleRefreshClient = OAuth2Client<
    BasicErrorResponse,
    BasicTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Google OAuth operations bound to an explicit provider configuration.
#[derive(Clone)]
pub struct GoogleOauthFlow {
    config: GoogleOauthConfig,
    http: reqwest::Client,
}

impl GoogleOauthFlow {
    pub fn new(config: GoogleOauthConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &GoogleOauthConfig {
        &self.config
    }

    /// Build the consent URL with offline access and a forced consent
    /// prompt, so Google issues a refresh token even on re-authorization.
    /// Returns the URL and the fresh anti-forgery state bound to it.
    pub fn authorize_url(&self) -> Result<(Url, CsrfToken), HubError> {
        let client = self.oauth2_client()?;
        let (auth_url, csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.config.scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .add_extra_param("include_granted_scopes", "true")
            .url();
        Ok((auth_url, csrf_token))
    }

    /// One-shot exchange of an authorization code for a credential set.
    pub async fn exchange_code(&self, code: String) -> Result<CredentialSet, HubError> {
        let client = self.oauth2_client()?;
        let token: BasicTokenResponse = client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(&self.http)
            .await?;
        info!("authorization code exchanged for token set");
        Ok(CredentialSet::from_token_response(
            &token,
            &self.config,
            Utc::now(),
        ))
    }

    fn oauth2_client(&self) -> Result<GoogleOauth2Client, HubError> {
        let client = OAuth2Client::new(ClientId::new(self.config.client_id.clone()))
            .set_client_secret(ClientSecret::new(self.config.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(self.config.auth_uri.clone())?)
            .set_token_uri(TokenUrl::new(self.config.token_uri.clone())?)
            .set_redirect_uri(RedirectUrl::new(self.config.redirect_uri.clone())?);
        Ok(client)
    }
}

/// Renew an access token with the stored refresh token, against the token
/// endpoint and client identity persisted with the credential set. Returns
/// the new access token and expiry; the refresh token itself is untouched.
pub async fn refresh_access_token(
    stored: &StoredCredential,
    http: &reqwest::Client,
) -> Result<(String, DateTime<Utc>), HubError> {
    let client = OAuth2Client::new(ClientId::new(stored.client_id.clone()))
        .set_client_secret(ClientSecret::new(stored.client_secret.clone()))
        .set_token_uri(TokenUrl::new(stored.token_uri.clone())?);
    let client: GoogleRefreshClient = client;

    let token: BasicTokenResponse = client
        .exchange_refresh_token(&RefreshToken::new(stored.refresh_token.clone()))
        .request_async(http)
        .await?;

    let expires_in = token
        .expires_in()
        .map(|d| Duration::seconds(d.as_secs() as i64))
        .unwrap_or_else(|| Duration::seconds(3600));
    info!(owner_id = stored.owner_id, "access token refreshed");
    Ok((
        token.access_token().secret().clone(),
        Utc::now() + expires_in,
    ))
}
