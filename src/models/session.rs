// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Server-side login session.

use super::AccessToken;
use chrono::{DateTime, Utc};

/// A logged-in browser, keyed by the opaque ID held in its session cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub token: AccessToken,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session lifetime; the session cookie carries the same max-age.
pub const SESSION_TTL_DAYS: i64 = 30;
