// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Interactive map adapter.
//!
//! [`MapWidget`] holds the widget state a client renders: the view, the tile
//! layer and the accumulated markers. Markers have no identity and are never
//! removed; a fresh widget is created on reset.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;

use crate::models::Coords;

pub const DEFAULT_ZOOM: u8 = 13;
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Tile layer and zoom used when creating and re-centering the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOptions {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

/// What the controller needs from a map widget.
pub trait MapAdapter: Send + Sync {
    /// Create and mount the widget centred on `center`.
    fn init(center: Coords, options: &MapOptions) -> Self
    where
        Self: Sized;

    /// Start forwarding click events to the controller.
    fn subscribe_clicks(&mut self);

    /// True once clicks are being forwarded.
    fn accepts_clicks(&self) -> bool;

    /// Add a marker with an open popup that stays open.
    fn place_marker(&mut self, coords: Coords, popup_html: &str, popup_class: &str);

    /// Animate the view to `coords`.
    fn center_on(&mut self, coords: Coords, zoom: u8);
}

/// Popup options applied to every marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub close_on_escape_key: bool,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
            close_on_escape_key: false,
        }
    }
}

/// A placed marker and its popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub coords: Coords,
    pub popup_html: String,
    pub popup_class: String,
    pub popup: PopupOptions,
}

/// Current view of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapViewport {
    pub center: Coords,
    pub zoom: u8,
    /// Whether the last move should be animated
    pub animate: bool,
}

/// Map widget state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapWidget {
    viewport: MapViewport,
    tile_url: String,
    attribution: String,
    markers: Vec<Marker>,
    clicks_subscribed: bool,
}

impl MapWidget {
    pub fn viewport(&self) -> MapViewport {
        self.viewport
    }

    pub fn tile_url(&self) -> &str {
        &self.tile_url
    }

    pub fn attribution(&self) -> &str {
        &self.attribution
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Markers as a GeoJSON FeatureCollection of points.
    pub fn markers_geojson(&self) -> FeatureCollection {
        let features = self
            .markers
            .iter()
            .map(|marker| {
                let mut properties = JsonObject::new();
                properties.insert("popupHtml".to_string(), marker.popup_html.clone().into());
                properties.insert("popupClass".to_string(), marker.popup_class.clone().into());

                Feature {
                    bbox: None,
                    // GeoJSON positions are [longitude, latitude]
                    geometry: Some(Geometry::new(Value::Point(vec![
                        marker.coords.lng,
                        marker.coords.lat,
                    ]))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

impl MapAdapter for MapWidget {
    fn init(center: Coords, options: &MapOptions) -> Self {
        Self {
            viewport: MapViewport {
                center,
                zoom: options.zoom,
                animate: false,
            },
            tile_url: options.tile_url.clone(),
            attribution: options.attribution.clone(),
            markers: Vec::new(),
            clicks_subscribed: false,
        }
    }

    fn subscribe_clicks(&mut self) {
        self.clicks_subscribed = true;
    }

    fn accepts_clicks(&self) -> bool {
        self.clicks_subscribed
    }

    fn place_marker(&mut self, coords: Coords, popup_html: &str, popup_class: &str) {
        self.markers.push(Marker {
            coords,
            popup_html: popup_html.to_string(),
            popup_class: popup_class.to_string(),
            popup: PopupOptions::default(),
        });
    }

    fn center_on(&mut self, coords: Coords, zoom: u8) {
        self.viewport = MapViewport {
            center: coords,
            zoom,
            animate: true,
        };
    }
}
