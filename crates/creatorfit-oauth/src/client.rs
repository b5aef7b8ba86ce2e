//! HTTP client for Instagram Login.
//!
//! Three endpoints are used: the browser-facing authorize page, the
//! code-for-token exchange, and the Graph `me` profile lookup.

use std::time::Duration;

use creatorfit_core::InstagramAppConfig;
use reqwest::{Client, Response, Url};

use crate::error::OAuthError;
use crate::types::{AccessToken, ApiErrorBody, InstagramProfile, TokenResponse};

const AUTHORIZE_URL: &str = "https://www.instagram.com/oauth/authorize";
const TOKEN_URL: &str = "https://api.instagram.com/oauth/access_token";
const GRAPH_BASE_URL: &str = "https://graph.instagram.com/";

/// Scope needed to read the profile and media count.
pub const DEFAULT_SCOPE: &str = "instagram_business_basic";

const PROFILE_FIELDS: &str = "id,username,account_type,media_count";

/// Client for the Instagram OAuth flow.
///
/// Use [`InstagramClient::new`] for production or
/// [`InstagramClient::with_base_url`] to point every endpoint at a mock server.
pub struct InstagramClient {
    client: Client,
    app: InstagramAppConfig,
    authorize_url: Url,
    token_url: Url,
    graph_base_url: Url,
}

impl InstagramClient {
    /// Creates a client pointed at the production Instagram endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(app: InstagramAppConfig, timeout_secs: u64) -> Result<Self, OAuthError> {
        Self::build(app, timeout_secs, AUTHORIZE_URL, TOKEN_URL, GRAPH_BASE_URL)
    }

    /// Creates a client whose endpoints all live under `base_url`
    /// (`/oauth/authorize`, `/oauth/access_token`, `/me`).
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Http`] if the client cannot be built, or
    /// [`OAuthError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        app: InstagramAppConfig,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, OAuthError> {
        let base = base_url.trim_end_matches('/');
        Self::build(
            app,
            timeout_secs,
            &format!("{base}/oauth/authorize"),
            &format!("{base}/oauth/access_token"),
            &format!("{base}/"),
        )
    }

    fn build(
        app: InstagramAppConfig,
        timeout_secs: u64,
        authorize_url: &str,
        token_url: &str,
        graph_base_url: &str,
    ) -> Result<Self, OAuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("creatorfit/0.1")
            .build()?;

        Ok(Self {
            client,
            app,
            authorize_url: parse_url(authorize_url)?,
            token_url: parse_url(token_url)?,
            graph_base_url: parse_url(graph_base_url)?,
        })
    }

    /// URL to redirect the creator's browser to.
    #[must_use]
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.app.client_id)
            .append_pair("redirect_uri", &self.app.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", DEFAULT_SCOPE)
            .append_pair("state", state);
        url
    }

    /// Exchange an authorization code for a short-lived access token.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::Api`] if Instagram rejects the code.
    /// - [`OAuthError::Http`] on network failure.
    /// - [`OAuthError::Deserialize`] if the body has an unexpected shape.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, OAuthError> {
        // Instagram appends "#_" to the code in some redirect flows.
        let code = code.trim_end_matches("#_");

        let response = self
            .client
            .post(self.token_url.clone())
            .form(&[
                ("client_id", self.app.client_id.as_str()),
                ("client_secret", self.app.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.app.redirect_uri.as_str()),
                ("code", code),
            ])
            .send()
            .await?;

        let body = read_body(response, "token exchange").await?;
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| OAuthError::Deserialize {
                context: "token exchange".to_string(),
                source: e,
            })?;

        match parsed {
            TokenResponse::Flat(token) => Ok(token),
            TokenResponse::Wrapped { data } => data.into_iter().next().ok_or(OAuthError::Api {
                status: 200,
                message: "token response contained no data".to_string(),
            }),
        }
    }

    /// Fetch the profile of the account that owns `access_token`.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::Api`] if the token is rejected.
    /// - [`OAuthError::Http`] on network failure.
    /// - [`OAuthError::Deserialize`] if the body has an unexpected shape.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<InstagramProfile, OAuthError> {
        let mut url = self
            .graph_base_url
            .join("me")
            .map_err(|e| OAuthError::InvalidBaseUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("fields", PROFILE_FIELDS)
            .append_pair("access_token", access_token);

        let response = self.client.get(url).send().await?;
        let body = read_body(response, "profile").await?;

        serde_json::from_str(&body).map_err(|e| OAuthError::Deserialize {
            context: "profile".to_string(),
            source: e,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, OAuthError> {
    Url::parse(raw).map_err(|e| OAuthError::InvalidBaseUrl(format!("'{raw}': {e}")))
}

/// Return the body of a 2xx response, or turn an error response into
/// [`OAuthError::Api`] with Instagram's message when it sent one.
async fn read_body(response: Response, context: &str) -> Result<String, OAuthError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.error_message.or_else(|| b.error.and_then(|e| e.message)))
        .unwrap_or_else(|| format!("{context} failed"));

    tracing::warn!(status = status.as_u16(), %message, context, "instagram request failed");
    Err(OAuthError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
