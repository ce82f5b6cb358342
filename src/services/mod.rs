// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod mastodon;
pub mod og_image;

pub use mastodon::{AuthorizationRequest, MastodonClient, MastodonService};
