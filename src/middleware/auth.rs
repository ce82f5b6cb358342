// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lookup from the session cookie.

use crate::cookies;
use crate::error::AppError;
use crate::models::Session;
use crate::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// The caller's live session, or `None` when not logged in.
///
/// Never rejects for a missing, unknown or expired session; handlers decide
/// whether anonymous access is allowed, so input validation can run before
/// the authentication check.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
    /// The session, or `Unauthorized`.
    pub fn require(self) -> Result<Session, AppError> {
        self.0.ok_or(AppError::Unauthorized)
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(session_id) = cookies::session_id(&jar) else {
            return Ok(Self(None));
        };

        let session = state.sessions.get(&session_id).await?;
        if session.is_none() {
            tracing::debug!("Session cookie does not match a live session");
        }
        Ok(Self(session))
    }
}
