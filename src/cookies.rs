// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cookies held by the browser.
//!
//! Only two values live client-side: the opaque session ID and the OAuth CSRF
//! state. Credentials stay in the server-side session table.

use crate::models::session::SESSION_TTL_DAYS;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Opaque session ID cookie.
pub const SESSION_COOKIE: &str = "oshiri_session";

/// CSRF state cookie set by `/api/auth/login`.
pub const STATE_COOKIE: &str = "oshiri_state";

/// How long a login attempt may take before the state cookie expires.
const STATE_TTL_MINUTES: i64 = 10;

fn base_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Session cookie for a freshly created session.
pub fn session_cookie(session_id: String, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(SESSION_COOKIE, session_id, secure);
    cookie.set_max_age(time::Duration::days(SESSION_TTL_DAYS));
    cookie
}

/// State cookie carrying the CSRF token for one login attempt.
pub fn state_cookie(state: String, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(STATE_COOKIE, state, secure);
    cookie.set_max_age(time::Duration::minutes(STATE_TTL_MINUTES));
    cookie
}

/// Cookie that deletes `name` on the client (empty value, `Max-Age=0`).
///
/// Attributes match the ones used on creation so browsers drop the original.
pub fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(name, String::new(), secure);
    cookie.make_removal();
    cookie
}

/// Session ID from the request cookies, if any.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    non_empty(jar, SESSION_COOKIE)
}

/// CSRF state from the request cookies, if any.
pub fn oauth_state(jar: &CookieJar) -> Option<String> {
    non_empty(jar, STATE_COOKIE)
}

fn non_empty(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
