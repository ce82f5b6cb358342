// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mastodon API client for the OAuth login flow.
//!
//! Handles:
//! - App registration (or reuse of a pre-registered app)
//! - Authorization URL construction with a CSRF state
//! - Authorization code exchange
//! - Account lookup via `verify_credentials`
//!
//! Nothing here retries; every failure is surfaced to the caller.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{AccessToken, AppRegistration, UserProfile};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Name shown to users on the instance's authorization page.
pub const CLIENT_NAME: &str = "Oshiri-Ase Counter";

/// OAuth scopes requested from the instance.
pub const SCOPES: &str = "read:accounts";

/// Upper bound on any single call to the instance.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Low-level Mastodon API client.
#[derive(Clone)]
pub struct MastodonClient {
    http: reqwest::Client,
    base_url: String,
    redirect_uri: String,
    website: String,
}

impl MastodonClient {
    /// Create a client for the instance at `base_url` (scheme included).
    pub fn new(
        base_url: String,
        redirect_uri: String,
        website: String,
    ) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            redirect_uri,
            website,
        })
    }

    /// Register this application with the instance.
    ///
    /// POST {instance}/api/v1/apps
    pub async fn register_app(&self) -> Result<AppRegistration, AppError> {
        let body = RegisterAppRequest {
            client_name: CLIENT_NAME,
            redirect_uris: &self.redirect_uri,
            scopes: SCOPES,
            website: &self.website,
        };

        let response = self
            .http
            .post(format!("{}/api/v1/apps", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::MastodonApi(format!("App registration failed: {}", e)))?;

        self.check_response_json(response, "register app").await
    }

    /// Build the authorization redirect for `app` carrying `state`.
    pub fn authorization_url(&self, app: &AppRegistration, state: &str) -> String {
        format!(
            "{}/oauth/authorize?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             state={}",
            self.base_url,
            urlencoding::encode(&app.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// POST {instance}/oauth/token
    pub async fn exchange_code(
        &self,
        app: &AppRegistration,
        code: &str,
    ) -> Result<AccessToken, AppError> {
        let body = TokenRequest {
            client_id: &app.client_id,
            client_secret: &app.client_secret,
            redirect_uri: &self.redirect_uri,
            grant_type: "authorization_code",
            code,
            scope: SCOPES,
        };

        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::MastodonApi(format!("Token exchange failed: {}", e)))?;

        self.check_response_json(response, "get access token").await
    }

    /// Fetch the account that owns `access_token`.
    ///
    /// GET {instance}/api/v1/accounts/verify_credentials
    pub async fn verify_credentials(&self, access_token: &str) -> Result<UserProfile, AppError> {
        let response = self
            .http
            .get(format!(
                "{}/api/v1/accounts/verify_credentials",
                self.base_url
            ))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::MastodonApi(format!("Account lookup failed: {}", e)))?;

        // Revoked or otherwise rejected token
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            tracing::info!("Mastodon rejected access token");
            return Err(AppError::Unauthorized);
        }

        let account: MastodonAccount = self
            .check_response_json(response, "fetch user account")
            .await?;

        Ok(account.into())
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
        action: &str,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, action, "Mastodon request failed");
            return Err(AppError::MastodonApi(format!(
                "Failed to {}: HTTP {}",
                action, status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::MastodonApi(format!("JSON parse error: {}", e)))
    }
}

#[derive(Serialize)]
struct RegisterAppRequest<'a> {
    client_name: &'a str,
    redirect_uris: &'a str,
    scopes: &'a str,
    website: &'a str,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
    code: &'a str,
    scope: &'a str,
}

/// Subset of the Mastodon `Account` entity we care about.
#[derive(Debug, Deserialize)]
struct MastodonAccount {
    id: String,
    username: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    avatar: String,
}

impl From<MastodonAccount> for UserProfile {
    fn from(account: MastodonAccount) -> Self {
        let display_name = account
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| account.username.clone());

        Self {
            id: account.id,
            username: account.username,
            display_name,
            avatar: account.avatar,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MastodonService - registration caching on top of the client
// ─────────────────────────────────────────────────────────────────────────────

/// Authorization redirect plus the CSRF state it carries.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// High-level Mastodon service shared by all requests.
///
/// The app registration is obtained at most once per process: either the
/// pre-registered app from configuration, or the first successful
/// `register_app` call.
#[derive(Clone)]
pub struct MastodonService {
    client: MastodonClient,
    preregistered: Option<AppRegistration>,
    registration: Arc<OnceCell<AppRegistration>>,
}

impl MastodonService {
    pub fn new(client: MastodonClient, preregistered: Option<AppRegistration>) -> Self {
        Self {
            client,
            preregistered,
            registration: Arc::new(OnceCell::new()),
        }
    }

    /// Build the service from application config.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = MastodonClient::new(
            config.instance_url.clone(),
            config.redirect_uri.clone(),
            config.site_url.clone(),
        )?;
        Ok(Self::new(client, config.preregistered_app.clone()))
    }

    /// Return the app registration, registering with the instance if needed.
    pub async fn register_app(&self) -> Result<AppRegistration, AppError> {
        if let Some(app) = &self.preregistered {
            return Ok(app.clone());
        }

        let app = self
            .registration
            .get_or_try_init(|| async {
                tracing::info!("Registering app with Mastodon instance");
                let app = self.client.register_app().await?;
                tracing::info!(app_id = %app.id, "App registered");
                Ok::<_, AppError>(app)
            })
            .await?;

        Ok(app.clone())
    }

    /// Generate a fresh CSRF state and the authorization URL carrying it.
    ///
    /// The caller must persist `state` (cookie) before redirecting.
    pub fn authorization_url(
        &self,
        app: &AppRegistration,
    ) -> Result<AuthorizationRequest, AppError> {
        let state = crate::crypto::random_token()?;
        let url = self.client.authorization_url(app, &state);
        Ok(AuthorizationRequest { url, state })
    }

    /// Exchange an authorization code for an access token.
    pub async fn get_access_token(
        &self,
        app: &AppRegistration,
        code: &str,
    ) -> Result<AccessToken, AppError> {
        self.client.exchange_code(app, code).await
    }

    /// Fetch the authenticated user's profile.
    pub async fn fetch_user_account(&self, access_token: &str) -> Result<UserProfile, AppError> {
        self.client.verify_credentials(access_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> AppRegistration {
        AppRegistration {
            id: "1".to_string(),
            client_id: "client id".to_string(),
            client_secret: "secret".to_string(),
        }
    }

    fn test_client() -> MastodonClient {
        MastodonClient::new(
            "https://famichiki.jp".to_string(),
            "http://localhost:8000/api/auth/callback".to_string(),
            "http://localhost:8000".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_authorization_url_encodes_params() {
        let url = test_client().authorization_url(&test_app(), "st/ate");

        assert!(url.starts_with("https://famichiki.jp/oauth/authorize?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fapi%2Fauth%2Fcallback"
        ));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=read%3Aaccounts"));
        assert!(url.ends_with("state=st%2Fate"));
    }

    #[test]
    fn test_service_issues_fresh_state() {
        let service = MastodonService::new(test_client(), Some(test_app()));
        let first = service.authorization_url(&test_app()).unwrap();
        let second = service.authorization_url(&test_app()).unwrap();

        assert_ne!(first.state, second.state);
        assert!(first.url.ends_with(&format!("state={}", first.state)));
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_app() {
        let config = Config {
            preregistered_app: Some(test_app()),
            ..Config::test_default()
        };
        let service = MastodonService::from_config(&config).unwrap();
        assert_eq!(service.register_app().await.unwrap(), test_app());
    }

    #[tokio::test]
    async fn test_unreachable_instance_times_out_or_fails() {
        // Nothing listens on the discard port; the call must fail rather than hang.
        let service = MastodonService::from_config(&Config::test_default()).unwrap();
        let result = tokio::time::timeout(
            Duration::from_secs(REQUEST_TIMEOUT_SECS + 5),
            service.register_app(),
        )
        .await
        .expect("client should give up within its timeout");
        assert!(matches!(result, Err(AppError::MastodonApi(_))));
    }

    #[tokio::test]
    async fn test_preregistered_app_skips_network() {
        // The client points at famichiki.jp, but no request is made.
        let service = MastodonService::new(test_client(), Some(test_app()));
        assert_eq!(service.register_app().await.unwrap(), test_app());
    }

    #[test]
    fn test_display_name_defaults_to_username() {
        let account = MastodonAccount {
            id: "7".to_string(),
            username: "alice".to_string(),
            display_name: Some(String::new()),
            avatar: "https://example.com/a.png".to_string(),
        };
        let profile = UserProfile::from(account);
        assert_eq!(profile.display_name, "alice");

        let account: MastodonAccount =
            serde_json::from_str(r#"{"id":"8","username":"bob","avatar":""}"#).unwrap();
        assert_eq!(UserProfile::from(account).display_name, "bob");
    }

    #[test]
    fn test_display_name_kept_when_present() {
        let account: MastodonAccount = serde_json::from_str(
            r#"{"id":"9","username":"carol","display_name":"Carol 💦","avatar":"x"}"#,
        )
        .unwrap();
        assert_eq!(UserProfile::from(account).display_name, "Carol 💦");
    }
}
