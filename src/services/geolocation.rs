// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-shot geolocation lookup used to centre the map at startup.

use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::models::Coords;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the user's current position.
pub trait Geolocator: Send + Sync {
    /// Request the position once; no streaming updates.
    fn current_position(&self) -> impl Future<Output = Result<Coords, GeolocationError>> + Send;
}

/// Geolocation backends selectable from configuration.
#[derive(Debug, Clone)]
pub enum GeolocationSource {
    /// Always report this position.
    Fixed(Coords),
    /// Ask an HTTP endpoint returning `{"lat": .., "lon": ..}`.
    Http { client: reqwest::Client, url: String },
    /// No position available; every lookup fails.
    Unavailable,
}

/// Position returned by an IP geolocation endpoint.
#[derive(Debug, Deserialize)]
struct LocationResponse {
    lat: f64,
    #[serde(alias = "lng", alias = "longitude")]
    lon: f64,
}

impl GeolocationSource {
    /// Prefer a fixed home position, then a lookup URL.
    pub fn from_config(config: &Config) -> Self {
        if let Some(home) = config.home_position {
            return GeolocationSource::Fixed(home);
        }
        if let Some(url) = &config.geolocation_url {
            match reqwest::Client::builder().timeout(LOOKUP_TIMEOUT).build() {
                Ok(client) => {
                    return GeolocationSource::Http {
                        client,
                        url: url.clone(),
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build geolocation HTTP client");
                }
            }
        }
        GeolocationSource::Unavailable
    }

    async fn lookup(client: &reqwest::Client, url: &str) -> Result<Coords, GeolocationError> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| GeolocationError::Lookup(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeolocationError::Lookup(format!(
                "lookup returned {}",
                response.status()
            )));
        }

        let location: LocationResponse = response
            .json()
            .await
            .map_err(|e| GeolocationError::Lookup(e.to_string()))?;

        let coords = Coords::new(location.lat, location.lon);
        if !coords.is_valid() {
            return Err(GeolocationError::InvalidPosition(coords.lat, coords.lng));
        }
        Ok(coords)
    }
}

impl Geolocator for GeolocationSource {
    async fn current_position(&self) -> Result<Coords, GeolocationError> {
        match self {
            GeolocationSource::Fixed(coords) => Ok(*coords),
            GeolocationSource::Http { client, url } => Self::lookup(client, url).await,
            GeolocationSource::Unavailable => Err(GeolocationError::Unavailable),
        }
    }
}

/// Geolocation failures.
#[derive(Debug, thiserror::Error)]
pub enum GeolocationError {
    #[error("No geolocation source configured")]
    Unavailable,

    #[error("Geolocation lookup failed: {0}")]
    Lookup(String),

    #[error("Geolocation returned invalid position ({0}, {1})")]
    InvalidPosition(f64, f64),
}
