//! External identity provider
//!
//! The login flow only needs two things from a provider: a URL to send the
//! browser to, and a way to turn the returned authorization code into a
//! profile. `GoogleIdentityProvider` does both with the authorization-code
//! grant and the userinfo endpoint.

use crate::config::AuthSettings;
use crate::error::{Result, ServerError};
use async_trait::async_trait;
use mixtape_core::ExternalProfile;
use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, AuthorizationCode, ClientId,
    ClientSecret, CsrfToken, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;

/// Where to send the browser, and the state value it must come back with
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build a fresh authorization request
    fn authorization_url(&self) -> AuthorizationRequest;

    /// Exchange an authorization code for the user's profile
    async fn verify(&self, code: &str) -> Result<ExternalProfile>;
}

pub struct GoogleIdentityProvider {
    client: BasicClient,
    http: reqwest::Client,
    userinfo_url: String,
}

/// Userinfo payload; older endpoints call the name `displayName`
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    id: String,
    #[serde(alias = "displayName", default)]
    name: String,
}

impl GoogleIdentityProvider {
    pub fn new(settings: &AuthSettings) -> Result<Self> {
        let auth_url = AuthUrl::new(settings.auth_url.clone())
            .map_err(|e| ServerError::Config(format!("Invalid auth URL: {}", e)))?;
        let token_url = TokenUrl::new(settings.token_url.clone())
            .map_err(|e| ServerError::Config(format!("Invalid token URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(settings.redirect_url.clone())
            .map_err(|e| ServerError::Config(format!("Invalid redirect URL: {}", e)))?;

        let client = BasicClient::new(
            ClientId::new(settings.google_client_id.clone()),
            Some(ClientSecret::new(settings.google_client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url);

        Ok(Self {
            client,
            http: reqwest::Client::new(),
            userinfo_url: settings.userinfo_url.clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self) -> AuthorizationRequest {
        let (url, state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .url();

        AuthorizationRequest {
            url: url.to_string(),
            state: state.secret().clone(),
        }
    }

    async fn verify(&self, code: &str) -> Result<ExternalProfile> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| ServerError::Identity(format!("Token exchange failed: {}", e)))?;

        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .map_err(|e| ServerError::Identity(format!("Userinfo request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ServerError::Identity(format!(
                "Userinfo request returned {}",
                response.status()
            )));
        }

        let profile: GoogleProfile = response
            .json()
            .await
            .map_err(|e| ServerError::Identity(format!("Invalid userinfo payload: {}", e)))?;

        tracing::debug!(external_id = %profile.id, "Verified Google profile");

        Ok(ExternalProfile {
            id: profile.id,
            display_name: profile.name,
        })
    }
}
