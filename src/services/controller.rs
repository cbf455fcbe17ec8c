// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application controller.
//!
//! Owns the activity list and mediates between UI events, the map widget,
//! the list view and storage:
//! 1. Startup: locate the user, create the map, load and render stored activities
//! 2. Map click: open the entry form at the clicked point
//! 3. Form submit: validate, append, render, persist, hide the form
//! 4. List click: re-centre the map on the chosen activity
//!
//! The list only ever grows by appending. Every append is announced to the
//! list view, the map and any subscribed observers.

use crate::error::{AppError, Result};
use crate::models::activity::observe_activity_id;
use crate::models::form::{InputError, INVALID_INPUT_MESSAGE};
use crate::models::{Activity, ActivityKind, Coords, EntryForm, FormFields};
use crate::services::geolocation::Geolocator;
use crate::services::map::{MapAdapter, MapOptions};
use crate::services::render;
use crate::services::repository::ActivityRepository;
use crate::services::storage::KeyValueStore;

/// Receives list changes.
pub trait ActivityObserver: Send + Sync {
    fn activity_appended(&mut self, activity: &Activity);

    /// The list was emptied by a storage reset.
    fn cleared(&mut self) {}
}

/// One rendered entry of the activity list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: String,
    pub html: String,
}

/// Rendered activity list, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct ActivityListView {
    entries: Vec<ListEntry>,
}

impl ActivityListView {
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }
}

impl ActivityObserver for ActivityListView {
    fn activity_appended(&mut self, activity: &Activity) {
        // New entries go directly below the form
        self.entries.insert(
            0,
            ListEntry {
                id: activity.id().to_string(),
                html: render::list_entry_html(activity),
            },
        );
    }

    fn cleared(&mut self) {
        self.entries.clear();
    }
}

/// Controller over a map widget `M`, storage `S` and geolocation `G`.
pub struct Controller<M, S, G> {
    activities: Vec<Activity>,
    form: EntryForm,
    map: Option<M>,
    map_options: MapOptions,
    list: ActivityListView,
    observers: Vec<Box<dyn ActivityObserver>>,
    repository: ActivityRepository<S>,
    geolocator: G,
}

impl<M, S, G> Controller<M, S, G>
where
    M: MapAdapter,
    S: KeyValueStore,
    G: Geolocator,
{
    /// Run the startup sequence and return the ready controller.
    pub async fn start(
        repository: ActivityRepository<S>,
        geolocator: G,
        map_options: MapOptions,
    ) -> Self {
        let mut controller = Self {
            activities: Vec::new(),
            form: EntryForm::default(),
            map: None,
            map_options,
            list: ActivityListView::default(),
            observers: Vec::new(),
            repository,
            geolocator,
        };
        controller.boot().await;
        controller
    }

    async fn boot(&mut self) {
        match self.geolocator.current_position().await {
            Ok(position) => {
                let mut map = M::init(position, &self.map_options);
                map.subscribe_clicks();
                self.map = Some(map);
                tracing::info!(
                    lat = position.lat,
                    lng = position.lng,
                    zoom = self.map_options.zoom,
                    "Map initialized"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not get your position; map unavailable");
            }
        }

        self.activities = self.repository.load();
        for activity in &self.activities {
            observe_activity_id(activity.id());
            self.list.activity_appended(activity);
            if let Some(map) = self.map.as_mut() {
                render::place_activity_marker(map, activity);
            }
        }
    }

    /// Register an extra observer for appended activities.
    pub fn subscribe(&mut self, observer: Box<dyn ActivityObserver>) {
        self.observers.push(observer);
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn list(&self) -> &ActivityListView {
        &self.list
    }

    /// Map click: remember the location and open the form.
    pub fn on_map_click(&mut self, coords: Coords) -> Result<()> {
        if !self.map.as_ref().is_some_and(|m| m.accepts_clicks()) {
            return Err(AppError::MapUnavailable);
        }
        if !coords.is_valid() {
            return Err(AppError::BadRequest(format!(
                "Invalid coordinates ({}, {})",
                coords.lat, coords.lng
            )));
        }

        self.form.show(coords);
        tracing::debug!(lat = coords.lat, lng = coords.lng, "Form opened");
        Ok(())
    }

    /// Type select changed: show the matching variant input.
    pub fn on_type_field_change(&mut self, kind: ActivityKind) {
        self.form.select_kind(kind);
    }

    /// Form submit: validate, then log the activity.
    ///
    /// Requires a preceding map click. Invalid input leaves the form open and
    /// the list untouched.
    pub fn on_form_submit(&mut self, fields: &FormFields) -> Result<Activity> {
        let pending = self.form.pending_coords().ok_or(AppError::FormNotOpen)?;

        let activity = fields
            .parse()
            .into_activity(pending)
            .map_err(|e: InputError| {
                tracing::debug!(error = %e, kind = %fields.kind, "Rejected form input");
                AppError::Validation(INVALID_INPUT_MESSAGE.to_string())
            })?;

        self.append(activity.clone());
        self.form.hide_and_reset();
        self.repository
            .save(&self.activities)
            .map_err(|e| AppError::Storage(e.to_string()))?;

        tracing::info!(
            id = activity.id(),
            kind = %activity.kind(),
            distance_km = activity.distance_km(),
            duration_min = activity.duration_min(),
            "Activity logged"
        );
        Ok(activity)
    }

    fn append(&mut self, activity: Activity) {
        self.list.activity_appended(&activity);
        if let Some(map) = self.map.as_mut() {
            render::place_activity_marker(map, &activity);
        }
        for observer in &mut self.observers {
            observer.activity_appended(&activity);
        }
        self.activities.push(activity);
    }

    /// List click: centre the map on the activity with `id`.
    ///
    /// Returns false, without touching the map, for an unknown id.
    pub fn on_list_item_click(&mut self, id: &str) -> bool {
        let Some(activity) = self.activities.iter().find(|a| a.id() == id) else {
            tracing::debug!(id, "List click for unknown activity");
            return false;
        };
        let Some(map) = self.map.as_mut() else {
            return false;
        };

        map.center_on(activity.coords(), self.map_options.zoom);
        true
    }

    /// Erase stored activities and start over.
    pub async fn reset_local_storage(&mut self) -> Result<()> {
        self.repository
            .clear()
            .map_err(|e| AppError::Storage(e.to_string()))?;

        self.activities.clear();
        self.form = EntryForm::default();
        self.map = None;
        self.list.cleared();
        for observer in &mut self.observers {
            observer.cleared();
        }

        tracing::info!("Local storage reset");
        self.boot().await;
        Ok(())
    }
}
