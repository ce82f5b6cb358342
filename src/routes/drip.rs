// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared drip counter routes.

use crate::error::Result;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/drip-count", get(get_count).post(increment))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CountResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub count: u64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IncrementResponse {
    pub success: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub count: u64,
}

/// Current count, raised to the pin count first if it has fallen behind.
pub async fn reconciled_count(state: &AppState) -> Result<u64> {
    let pins = state.pins.count().await?;
    let count = state.drips.raise_to(pins).await?;
    tracing::debug!(pins, count, "Drip count reconciled");
    Ok(count)
}

async fn get_count(State(state): State<Arc<AppState>>) -> Result<Json<CountResponse>> {
    let count = reconciled_count(&state).await?;
    Ok(Json(CountResponse { count }))
}

async fn increment(State(state): State<Arc<AppState>>) -> Result<Json<IncrementResponse>> {
    let count = state.drips.increment().await?;
    Ok(Json(IncrementResponse {
        success: true,
        count,
    }))
}
