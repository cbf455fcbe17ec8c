// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod controller;
pub mod geolocation;
pub mod map;
pub mod render;
pub mod repository;
pub mod storage;

pub use controller::{ActivityListView, ActivityObserver, Controller, ListEntry};
pub use geolocation::{GeolocationError, GeolocationSource, Geolocator};
pub use map::{MapAdapter, MapOptions, MapWidget, Marker};
pub use repository::{ActivityRepository, STORAGE_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageBackend, StorageError};
