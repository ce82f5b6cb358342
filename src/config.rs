// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. A pre-registered Mastodon app can be
//! supplied through `MASTODON_APP` to skip the registration call.

use crate::models::AppRegistration;
use std::env;

/// Mastodon instance used when `MASTODON_INSTANCE` is not set.
pub const DEFAULT_INSTANCE: &str = "famichiki.jp";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Mastodon instance (scheme included, no trailing slash)
    pub instance_url: String,
    /// OAuth callback URL registered with the instance
    pub redirect_uri: String,
    /// Public origin of this site (used for app registration, CORS and cookies)
    pub site_url: String,
    /// Pre-registered app credentials, if supplied
    pub preregistered_app: Option<AppRegistration>,
    /// Server port
    pub port: u16,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self::test_default()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let preregistered_app = match env::var("MASTODON_APP") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                serde_json::from_str(raw.trim())
                    .map_err(|e| ConfigError::Invalid("MASTODON_APP", e.to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            instance_url: normalize_instance(
                &env::var("MASTODON_INSTANCE").unwrap_or_else(|_| DEFAULT_INSTANCE.to_string()),
            ),
            redirect_uri: env::var("REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8000/api/auth/callback".to_string()),
            site_url: env::var("WEBSITE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            preregistered_app,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
        })
    }

    /// Config pointing at localhost, with no pre-registered app.
    pub fn test_default() -> Self {
        Self {
            instance_url: "http://127.0.0.1:9".to_string(),
            redirect_uri: "http://localhost:8000/api/auth/callback".to_string(),
            site_url: "http://localhost:8000".to_string(),
            preregistered_app: None,
            port: 8000,
        }
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.site_url.starts_with("https://")
    }
}

/// Expand a bare hostname to an https base URL; keep explicit schemes as-is.
fn normalize_instance(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    Invalid(&'static str, String),
}
