// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Oshiri-Ase: a shared sweat-drip counter with a world map of pins.
//!
//! Users log in through a Mastodon instance, bump the shared counter and
//! drop geotagged pins. This crate provides the JSON API behind the UI.

pub mod config;
pub mod cookies;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use error::AppError;
use db::{
    DripCounter, MemoryDripCounter, MemoryPinStore, MemorySessionStore, PinStore, SessionStore,
};
use services::MastodonService;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub mastodon: MastodonService,
    pub pins: Arc<dyn PinStore>,
    pub drips: Arc<dyn DripCounter>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// State backed by the process-local stores.
    pub fn in_memory(config: Config) -> Result<Self, AppError> {
        let mastodon = MastodonService::from_config(&config)?;
        Ok(Self {
            config,
            mastodon,
            pins: Arc::new(MemoryPinStore::new()),
            drips: Arc::new(MemoryDripCounter::new()),
            sessions: Arc::new(MemorySessionStore::new()),
        })
    }
}
