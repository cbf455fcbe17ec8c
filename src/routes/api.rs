// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read routes for the activity list and map, plus list clicks and reset.

use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityDetails, ActivityKind, Coords, EntryForm};
use crate::services::MapWidget;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Activity, list and map routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/activities", get(get_activities))
        .route("/api/activities/{id}", get(get_activity))
        .route("/api/activities/{id}/focus", post(focus_activity))
        .route("/api/map/markers", get(get_markers))
        .route("/api/storage", delete(reset_storage))
}

// ─── Activities ──────────────────────────────────────────────

/// Activity with its derived metric.
#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    pub id: String,
    pub kind: ActivityKind,
    pub description: String,
    pub created_at: String,
    pub coords: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    pub cadence_spm: Option<f64>,
    pub elevation_gain_m: Option<f64>,
    pub pace_min_per_km: Option<f64>,
    pub speed_km_per_h: Option<f64>,
}

impl From<&Activity> for ActivityResponse {
    fn from(activity: &Activity) -> Self {
        let (cadence_spm, elevation_gain_m) = match activity.details() {
            ActivityDetails::Running { cadence_spm } => (Some(cadence_spm), None),
            ActivityDetails::Cycling { elevation_gain_m } => (None, Some(elevation_gain_m)),
        };
        Self {
            id: activity.id().to_string(),
            kind: activity.kind(),
            description: activity.description().to_string(),
            created_at: format_utc_rfc3339(activity.created_at()),
            coords: activity.coords(),
            distance_km: activity.distance_km(),
            duration_min: activity.duration_min(),
            cadence_spm,
            elevation_gain_m,
            pace_min_per_km: activity.pace_min_per_km(),
            speed_km_per_h: activity.speed_km_per_h(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityResponse>,
    pub total: u32,
}

/// List activities in insertion order.
async fn get_activities(State(state): State<Arc<AppState>>) -> Json<ActivitiesResponse> {
    let controller = state.controller.lock().await;
    let activities: Vec<ActivityResponse> = controller
        .activities()
        .iter()
        .map(ActivityResponse::from)
        .collect();

    Json(ActivitiesResponse {
        total: activities.len() as u32,
        activities,
    })
}

/// Get one activity by id.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActivityResponse>> {
    let controller = state.controller.lock().await;
    controller
        .activities()
        .iter()
        .find(|a| a.id() == id)
        .map(|a| Json(ActivityResponse::from(a)))
        .ok_or_else(|| AppError::NotFound(format!("Activity {}", id)))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FocusResponse {
    pub centered: bool,
}

/// List entry clicked: re-centre the map on that activity.
///
/// An id that no longer resolves is not an error; nothing moves.
async fn focus_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<FocusResponse> {
    let mut controller = state.controller.lock().await;
    let centered = controller.on_list_item_click(&id);
    Json(FocusResponse { centered })
}

// ─── UI State ────────────────────────────────────────────────

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FormResponse {
    pub visible: bool,
    pub kind: ActivityKind,
    /// "cadence" or "elevation"
    pub variant_field: String,
    pub pending: Option<Coords>,
    pub focused: Option<String>,
}

impl From<&EntryForm> for FormResponse {
    fn from(form: &EntryForm) -> Self {
        Self {
            visible: form.is_visible(),
            kind: form.kind(),
            variant_field: form.visible_variant_field().as_str().to_string(),
            pending: form.pending_coords(),
            focused: form.focused().map(|f| f.as_str().to_string()),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MapResponse {
    pub center: Coords,
    pub zoom: u8,
    pub animate: bool,
    pub tile_url: String,
    pub attribution: String,
    pub marker_count: u32,
}

impl From<&MapWidget> for MapResponse {
    fn from(map: &MapWidget) -> Self {
        let viewport = map.viewport();
        Self {
            center: viewport.center,
            zoom: viewport.zoom,
            animate: viewport.animate,
            tile_url: map.tile_url().to_string(),
            attribution: map.attribution().to_string(),
            marker_count: map.markers().len() as u32,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ListEntryResponse {
    pub id: String,
    pub html: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StateResponse {
    pub form: FormResponse,
    /// Absent when geolocation failed
    pub map: Option<MapResponse>,
    /// Rendered list entries, newest first
    pub list: Vec<ListEntryResponse>,
}

/// Everything a client needs to draw the page.
async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let controller = state.controller.lock().await;

    Json(StateResponse {
        form: FormResponse::from(controller.form()),
        map: controller.map().map(MapResponse::from),
        list: controller
            .list()
            .entries()
            .iter()
            .map(|entry| ListEntryResponse {
                id: entry.id.clone(),
                html: entry.html.clone(),
            })
            .collect(),
    })
}

/// Markers as GeoJSON; empty when there is no map.
async fn get_markers(State(state): State<Arc<AppState>>) -> Json<geojson::FeatureCollection> {
    let controller = state.controller.lock().await;
    let collection = match controller.map() {
        Some(map) => map.markers_geojson(),
        None => geojson::FeatureCollection {
            bbox: None,
            features: vec![],
            foreign_members: None,
        },
    };
    Json(collection)
}

// ─── Storage ─────────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

/// Erase stored activities and restart the app fresh.
async fn reset_storage(State(state): State<Arc<AppState>>) -> Result<Json<ResetResponse>> {
    let mut controller = state.controller.lock().await;
    controller.reset_local_storage().await?;

    Ok(Json(ResetResponse {
        success: true,
        message: "All activities removed.".to_string(),
    }))
}
