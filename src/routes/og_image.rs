// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Open Graph image route.

use super::drip::reconciled_count;
use crate::services::og_image::render_svg;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/og-image", get(og_image))
}

/// SVG preview card with the current count. Falls back to 0 if the count is unavailable.
async fn og_image(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let count = reconciled_count(&state).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to read drip count for OG image");
        0
    });

    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=60, s-maxage=60"),
        ],
        render_svg(count),
    )
}
