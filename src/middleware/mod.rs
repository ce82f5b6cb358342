// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware and request guards (session lookup, security headers).

pub mod auth;
pub mod security;

pub use auth::MaybeSession;
