//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;
use std::path::PathBuf;

use crate::models::Coords;
use crate::services::map::{MapOptions, DEFAULT_TILE_URL, DEFAULT_ZOOM, OSM_ATTRIBUTION};

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Directory for file-backed storage; `None` keeps everything in memory
    pub storage_path: Option<PathBuf>,
    /// Zoom used for the initial view and when re-centering
    pub map_zoom_level: u8,
    /// Tile layer URL template
    pub map_tile_url: String,
    /// Fixed position reported by geolocation
    pub home_position: Option<Coords>,
    /// HTTP endpoint for position lookups, used when no fixed position is set
    pub geolocation_url: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            storage_path: None,
            map_zoom_level: DEFAULT_ZOOM,
            map_tile_url: DEFAULT_TILE_URL.to_string(),
            home_position: Some(Coords::new(37.3861, -122.0839)),
            geolocation_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let map_zoom_level = match env::var("MAP_ZOOM_LEVEL") {
            Ok(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|z| *z <= 22)
                .ok_or(ConfigError::Invalid("MAP_ZOOM_LEVEL"))?,
            Err(_) => DEFAULT_ZOOM,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage_path: non_empty_var("STORAGE_PATH").map(PathBuf::from),
            map_zoom_level,
            map_tile_url: non_empty_var("MAP_TILE_URL")
                .unwrap_or_else(|| DEFAULT_TILE_URL.to_string()),
            home_position: home_position_from_env()?,
            geolocation_url: non_empty_var("GEOLOCATION_URL"),
        })
    }

    /// Map settings derived from this configuration.
    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            zoom: self.map_zoom_level,
            tile_url: self.map_tile_url.clone(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `HOME_LAT` and `HOME_LNG` must be given together.
fn home_position_from_env() -> Result<Option<Coords>, ConfigError> {
    match (non_empty_var("HOME_LAT"), non_empty_var("HOME_LNG")) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let lat = lat.parse().map_err(|_| ConfigError::Invalid("HOME_LAT"))?;
            let lng = lng.parse().map_err(|_| ConfigError::Invalid("HOME_LNG"))?;
            let coords = Coords::new(lat, lng);
            if !coords.is_valid() {
                return Err(ConfigError::Invalid("HOME_LAT/HOME_LNG"));
            }
            Ok(Some(coords))
        }
        (Some(_), None) => Err(ConfigError::Missing("HOME_LNG")),
        (None, Some(_)) => Err(ConfigError::Missing("HOME_LAT")),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
