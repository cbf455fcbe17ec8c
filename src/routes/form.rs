// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! UI event routes: map clicks and the entry form.

use crate::error::Result;
use crate::models::{ActivityKind, Coords, FormFields};
use crate::routes::api::{ActivityResponse, FormResponse};
use crate::AppState;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Map and form routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/map/click", post(map_click))
        .route("/api/form/type", post(change_type))
        .route("/api/form/submit", post(submit_form))
}

/// Map clicked at a point: open the form there.
async fn map_click(
    State(state): State<Arc<AppState>>,
    Json(coords): Json<Coords>,
) -> Result<Json<FormResponse>> {
    let mut controller = state.controller.lock().await;
    controller.on_map_click(coords)?;
    Ok(Json(FormResponse::from(controller.form())))
}

#[derive(Deserialize)]
struct TypeChange {
    kind: ActivityKind,
}

/// Type select changed.
async fn change_type(
    State(state): State<Arc<AppState>>,
    Json(change): Json<TypeChange>,
) -> Json<FormResponse> {
    let mut controller = state.controller.lock().await;
    controller.on_type_field_change(change.kind);
    Json(FormResponse::from(controller.form()))
}

/// Form submitted.
async fn submit_form(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<FormFields>,
) -> Result<(StatusCode, Json<ActivityResponse>)> {
    let mut controller = state.controller.lock().await;
    let activity = controller.on_form_submit(&fields)?;
    Ok((StatusCode::CREATED, Json(ActivityResponse::from(&activity))))
}
