// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mapty-Tracker: log runs and rides by clicking a map
//!
//! This crate provides the backend for a map-based activity log: the
//! controller that turns map clicks and form submissions into activities,
//! the map widget state, and persistence of the activity list.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{
    ActivityRepository, Controller, GeolocationSource, MapWidget, StorageBackend,
};
use tokio::sync::Mutex;

/// Controller type used by the running service.
pub type AppController = Controller<MapWidget, StorageBackend, GeolocationSource>;

/// Shared application state.
///
/// All UI events go through the one controller lock, so activity list
/// mutations are applied one at a time in arrival order.
pub struct AppState {
    pub config: Config,
    pub controller: Mutex<AppController>,
}

impl AppState {
    /// Build storage and geolocation from `config` and run controller startup.
    pub async fn new(config: Config) -> Self {
        let storage = StorageBackend::from_path(config.storage_path.as_deref());
        Self::with_storage(config, storage).await
    }

    /// Like [`AppState::new`] with an explicit storage backend.
    pub async fn with_storage(config: Config, storage: StorageBackend) -> Self {
        let geolocator = GeolocationSource::from_config(&config);
        let controller: AppController = Controller::start(
            ActivityRepository::new(storage),
            geolocator,
            config.map_options(),
        )
        .await;

        Self {
            config,
            controller: Mutex::new(controller),
        }
    }
}
