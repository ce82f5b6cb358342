// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mastodon OAuth authentication routes.
//!
//! Login flow: `/api/auth/login` stores a CSRF state cookie and redirects to
//! the instance; `/api/auth/callback` checks the state, exchanges the code,
//! creates a server-side session and sets the session cookie.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::{found, SuccessResponse};
use crate::cookies;
use crate::error::{AppError, Result};
use crate::extractors::AppQuery;
use crate::middleware::auth::MaybeSession;
use crate::models::UserProfile;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login", get(auth_login))
        .route("/api/auth/callback", get(auth_callback))
        .route("/api/auth/status", get(auth_status))
        .route("/api/auth/logout", post(logout))
}

/// Start OAuth flow - redirect to the instance's authorization page.
async fn auth_login(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Response> {
    let app = state.mastodon.register_app().await?;
    let request = state.mastodon.authorization_url(&app)?;

    tracing::info!(client_id = %app.client_id, "Starting OAuth flow, redirecting to Mastodon");

    let jar = jar.add(cookies::state_cookie(
        request.state,
        state.config.secure_cookies(),
    ));
    Ok((jar, found(&request.url)).into_response())
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    /// Set by the instance when the user denies access
    #[serde(default)]
    error: Option<String>,
}

/// How a callback with a valid state ended.
enum CallbackOutcome {
    /// Session created; carries the new session ID.
    LoggedIn(String),
    /// The instance reported an OAuth error (e.g. `access_denied`).
    Denied(String),
}

/// OAuth callback - validate state, exchange code for a token, create session.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    AppQuery(params): AppQuery<CallbackParams>,
) -> Response {
    let secure = state.config.secure_cookies();
    let stored_state = cookies::oauth_state(&jar);

    // The state is single-use, so drop it whatever the outcome.
    let jar = jar.add(cookies::removal_cookie(cookies::STATE_COOKIE, secure));

    match complete_login(&state, stored_state.as_deref(), params).await {
        Ok(CallbackOutcome::LoggedIn(session_id)) => {
            let jar = jar.add(cookies::session_cookie(session_id, secure));
            (jar, found("/")).into_response()
        }
        Ok(CallbackOutcome::Denied(error)) => {
            let location = format!("/?error={}", urlencoding::encode(&error));
            (jar, found(&location)).into_response()
        }
        Err(e) => (jar, e).into_response(),
    }
}

async fn complete_login(
    state: &AppState,
    stored_state: Option<&str>,
    params: CallbackParams,
) -> Result<CallbackOutcome> {
    let valid_state = match (stored_state, params.state.as_deref()) {
        (Some(stored), Some(given)) => crate::crypto::tokens_match(stored, given),
        _ => false,
    };
    if !valid_state {
        tracing::warn!(
            has_cookie = stored_state.is_some(),
            has_param = params.state.is_some(),
            "Rejecting OAuth callback with missing or mismatched state"
        );
        return Err(AppError::InvalidState);
    }

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Mastodon");
        return Ok(CallbackOutcome::Denied(error));
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::BadRequest("Authorization code missing".to_string()))?;

    tracing::info!("Exchanging authorization code for token");

    let app = state.mastodon.register_app().await?;
    let token = state.mastodon.get_access_token(&app, &code).await?;
    let session = state.sessions.create(token).await?;

    tracing::info!("OAuth successful, session created");
    Ok(CallbackOutcome::LoggedIn(session.id))
}

/// Login status response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusResponse {
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    fn logged_out(error: Option<String>) -> Self {
        Self {
            is_logged_in: false,
            user: None,
            error,
        }
    }
}

/// Report whether the caller is logged in, with a freshly fetched profile.
async fn auth_status(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
) -> Json<StatusResponse> {
    let Some(session) = session else {
        return Json(StatusResponse::logged_out(None));
    };

    match state
        .mastodon
        .fetch_user_account(&session.token.access_token)
        .await
    {
        Ok(user) => Json(StatusResponse {
            is_logged_in: true,
            user: Some(user),
            error: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Status check failed, reporting logged out");
            Json(StatusResponse::logged_out(Some(
                "Failed to verify authentication status".to_string(),
            )))
        }
    }
}

/// Logout - drop the server-side session and clear both cookies.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SuccessResponse>)> {
    if let Some(session_id) = cookies::session_id(&jar) {
        state.sessions.remove(&session_id).await?;
    }

    let secure = state.config.secure_cookies();
    let jar = jar
        .add(cookies::removal_cookie(cookies::SESSION_COOKIE, secure))
        .add(cookies::removal_cookie(cookies::STATE_COOKIE, secure));

    Ok((jar, Json(SuccessResponse { success: true })))
}
