// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer.
//!
//! Handlers only see the traits below; the in-memory implementations in
//! [`memory`] are the defaults wired up in `main`.

pub mod memory;

use crate::error::AppError;
use crate::models::{AccessToken, PinRecord, Session};
use futures_util::future::BoxFuture;

pub use memory::{MemoryDripCounter, MemoryPinStore, MemorySessionStore};

/// Pin records keyed by pin ID.
pub trait PinStore: Send + Sync {
    /// Store a new pin and return the stored record.
    fn insert(&self, pin: PinRecord) -> BoxFuture<'_, Result<PinRecord, AppError>>;

    /// Look up a pin by ID.
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<PinRecord>, AppError>>;

    /// All pins, in no particular order.
    fn list(&self) -> BoxFuture<'_, Result<Vec<PinRecord>, AppError>>;

    /// Number of stored pins.
    fn count(&self) -> BoxFuture<'_, Result<u64, AppError>>;
}

/// The shared drip counter.
pub trait DripCounter: Send + Sync {
    fn get(&self) -> BoxFuture<'_, Result<u64, AppError>>;

    /// Add one and return the new value.
    fn increment(&self) -> BoxFuture<'_, Result<u64, AppError>>;

    /// Raise the counter to at least `floor` and return the resulting value.
    fn raise_to(&self, floor: u64) -> BoxFuture<'_, Result<u64, AppError>>;
}

/// Server-side login sessions keyed by an opaque session ID.
pub trait SessionStore: Send + Sync {
    /// Create a session with a fresh random ID.
    fn create(&self, token: AccessToken) -> BoxFuture<'_, Result<Session, AppError>>;

    /// Look up a live session. Expired sessions are dropped and reported as absent.
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<Session>, AppError>>;

    /// Delete a session. Removing an unknown ID is not an error.
    fn remove<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), AppError>>;
}
