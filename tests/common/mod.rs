// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request};
use mapty_tracker::config::Config;
use mapty_tracker::models::Coords;
use mapty_tracker::routes::create_router;
use mapty_tracker::services::{
    KeyValueStore, MapAdapter, MapOptions, MemoryStore, StorageBackend, StorageError,
};
use mapty_tracker::AppState;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Position reported by the test geolocation source.
#[allow(dead_code)]
pub const HOME: Coords = Coords {
    lat: 37.3861,
    lng: -122.0839,
};

/// Create a test app with in-memory storage and a fixed position.
/// Returns the router, the shared state and a handle on the storage slots.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    create_test_app_with(Config {
        home_position: Some(HOME),
        ..Config::default()
    })
    .await
}

/// Create a test app from an explicit config (storage is always in memory).
#[allow(dead_code)]
pub async fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>, MemoryStore) {
    let store = MemoryStore::new();
    let state =
        Arc::new(AppState::with_storage(config, StorageBackend::Memory(store.clone())).await);
    (create_router(state.clone()), state, store)
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Map double that records every call.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordingMap {
    pub initial_center: Coords,
    pub zoom: u8,
    pub clicks: bool,
    pub markers: Vec<(Coords, String, String)>,
    pub center_calls: Vec<(Coords, u8)>,
}

impl MapAdapter for RecordingMap {
    fn init(center: Coords, options: &MapOptions) -> Self {
        Self {
            initial_center: center,
            zoom: options.zoom,
            clicks: false,
            markers: Vec::new(),
            center_calls: Vec::new(),
        }
    }

    fn subscribe_clicks(&mut self) {
        self.clicks = true;
    }

    fn accepts_clicks(&self) -> bool {
        self.clicks
    }

    fn place_marker(&mut self, coords: Coords, popup_html: &str, popup_class: &str) {
        self.markers
            .push((coords, popup_html.to_string(), popup_class.to_string()));
    }

    fn center_on(&mut self, coords: Coords, zoom: u8) {
        self.center_calls.push((coords, zoom));
    }
}

/// Memory store that counts writes.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    pub writes: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key)
    }
}
