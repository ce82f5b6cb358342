// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local stores. Contents are lost on restart.

use super::{DripCounter, PinStore, SessionStore};
use crate::error::AppError;
use crate::models::session::SESSION_TTL_DAYS;
use crate::models::{AccessToken, PinRecord, Session};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};

/// Pins held in a concurrent map keyed by pin ID.
#[derive(Default)]
pub struct MemoryPinStore {
    pins: DashMap<String, PinRecord>,
}

impl MemoryPinStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PinStore for MemoryPinStore {
    fn insert(&self, pin: PinRecord) -> BoxFuture<'_, Result<PinRecord, AppError>> {
        Box::pin(async move {
            self.pins.insert(pin.id.clone(), pin.clone());
            Ok(pin)
        })
    }

    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<PinRecord>, AppError>> {
        Box::pin(async move { Ok(self.pins.get(id).map(|entry| entry.value().clone())) })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<PinRecord>, AppError>> {
        Box::pin(async move {
            Ok(self
                .pins
                .iter()
                .map(|entry| entry.value().clone())
                .collect())
        })
    }

    fn count(&self) -> BoxFuture<'_, Result<u64, AppError>> {
        Box::pin(async move { Ok(self.pins.len() as u64) })
    }
}

/// Drip counter backed by a single atomic.
#[derive(Default)]
pub struct MemoryDripCounter {
    count: AtomicU64,
}

impl MemoryDripCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DripCounter for MemoryDripCounter {
    fn get(&self) -> BoxFuture<'_, Result<u64, AppError>> {
        Box::pin(async move { Ok(self.count.load(Ordering::SeqCst)) })
    }

    fn increment(&self) -> BoxFuture<'_, Result<u64, AppError>> {
        Box::pin(async move {
            // Wrapping at u64::MAX is not a practical concern.
            Ok(self.count.fetch_add(1, Ordering::SeqCst) + 1)
        })
    }

    fn raise_to(&self, floor: u64) -> BoxFuture<'_, Result<u64, AppError>> {
        Box::pin(async move {
            let previous = self.count.fetch_max(floor, Ordering::SeqCst);
            Ok(previous.max(floor))
        })
    }
}

/// Login sessions in a concurrent map keyed by session ID.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, token: AccessToken) -> BoxFuture<'_, Result<Session, AppError>> {
        Box::pin(async move {
            let now = Utc::now();

            // Sessions whose cookie never comes back are only reclaimed here.
            let before = self.sessions.len();
            self.sessions.retain(|_, session| !session.is_expired(now));
            let swept = before.saturating_sub(self.sessions.len());
            if swept > 0 {
                tracing::debug!(swept, "Swept expired sessions");
            }

            let session = Session {
                id: crate::crypto::random_token()?,
                token,
                created_at: now,
                expires_at: now + Duration::days(SESSION_TTL_DAYS),
            };
            self.sessions.insert(session.id.clone(), session.clone());
            Ok(session)
        })
    }

    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<Session>, AppError>> {
        Box::pin(async move {
            let now = Utc::now();
            // Clone out before removing so the shard lock is released.
            let session = self.sessions.get(id).map(|entry| entry.value().clone());
            match session {
                Some(session) if session.is_expired(now) => {
                    tracing::debug!(created_at = %session.created_at, "Dropping expired session");
                    self.sessions.remove(id);
                    Ok(None)
                }
                other => Ok(other),
            }
        })
    }

    fn remove<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), AppError>> {
        Box::pin(async move {
            self.sessions.remove(id);
            Ok(())
        })
    }
}
