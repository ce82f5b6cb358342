// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Map pin model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A pin dropped on the world map by an authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRecord {
    /// Random UUIDv4
    pub id: String,
    /// Mastodon account ID of the creator
    pub user_id: String,
    pub username: String,
    pub lat: f64,
    pub lng: f64,
    /// Creation time (Unix milliseconds)
    pub timestamp: i64,
}

/// Public projection of a pin (no account ID).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PinView {
    pub id: String,
    pub username: String,
    pub lat: f64,
    pub lng: f64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp: i64,
}

impl From<&PinRecord> for PinView {
    fn from(pin: &PinRecord) -> Self {
        Self {
            id: pin.id.clone(),
            username: pin.username.clone(),
            lat: pin.lat,
            lng: pin.lng,
            timestamp: pin.timestamp,
        }
    }
}
