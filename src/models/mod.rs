// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod account;
pub mod pin;
pub mod session;

pub use account::{AccessToken, AppRegistration, UserProfile};
pub use pin::{PinRecord, PinView};
pub use session::Session;
