// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Map pin routes.

use crate::error::{AppError, Result};
use crate::extractors::AppJson;
use crate::middleware::auth::MaybeSession;
use crate::models::{PinRecord, PinView};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/pins", get(list_pins).post(create_pin))
}

/// All pins, oldest first.
async fn list_pins(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PinView>>> {
    let mut pins = state.pins.list().await?;
    pins.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    Ok(Json(pins.iter().map(PinView::from).collect()))
}

/// New pin request body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePinRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreatePinResponse {
    pub success: bool,
    pub pin: PinView,
}

/// Drop a pin for the logged-in user.
///
/// Coordinates are checked before the session, so out-of-range input is a
/// 400 whether or not the caller is logged in.
async fn create_pin(
    State(state): State<Arc<AppState>>,
    session: MaybeSession,
    AppJson(body): AppJson<CreatePinRequest>,
) -> Result<(StatusCode, Json<CreatePinResponse>)> {
    body.validate().map_err(|e| {
        tracing::debug!(error = %e, lat = body.lat, lng = body.lng, "Rejecting pin");
        AppError::BadRequest("Invalid coordinates".to_string())
    })?;

    let session = session.require()?;
    let user = state
        .mastodon
        .fetch_user_account(&session.token.access_token)
        .await?;

    let pin = PinRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id,
        username: user.username,
        lat: body.lat,
        lng: body.lng,
        timestamp: chrono::Utc::now().timestamp_millis(),
    };
    let pin = state.pins.insert(pin).await?;

    tracing::info!(pin_id = %pin.id, username = %pin.username, "Pin created");

    Ok((
        StatusCode::CREATED,
        Json(CreatePinResponse {
            success: true,
            pin: PinView::from(&pin),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(lat: f64, lng: f64) -> CreatePinRequest {
        CreatePinRequest { lat, lng }
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(request(90.0, 180.0).validate().is_ok());
        assert!(request(-90.0, -180.0).validate().is_ok());
        assert!(request(0.0, 0.0).validate().is_ok());

        assert!(request(91.0, 0.0).validate().is_err());
        assert!(request(-90.5, 0.0).validate().is_err());
        assert!(request(0.0, -200.0).validate().is_err());
        assert!(request(0.0, 180.01).validate().is_err());
    }
}
