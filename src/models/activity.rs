// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged activity model (running or cycling) and its stored form.
//!
//! An [`Activity`] is immutable once constructed. Its derived metric (pace or
//! speed) is never stored as truth: it is computed from distance and duration
//! on every read, including after the record comes back from storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::format_month_day;

/// Last id handed out in this process (milliseconds since the epoch).
static LAST_ACTIVITY_ID: AtomicI64 = AtomicI64::new(0);

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Activity discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ActivityKind {
    #[default]
    Running,
    Cycling,
}

impl ActivityKind {
    /// Lowercase tag used in storage, CSS classes and popup class names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Running => "running",
            ActivityKind::Cycling => "cycling",
        }
    }

    /// Capitalized label used in descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Running => "Running",
            ActivityKind::Cycling => "Cycling",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ActivityKind::Running => "🏃‍♂️",
            ActivityKind::Cycling => "🚴‍♀️",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific payload, tagged by `kind` in serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActivityDetails {
    Running {
        /// Steps per minute
        #[serde(rename = "cadenceSpm")]
        cadence_spm: f64,
    },
    Cycling {
        /// Meters climbed; may be zero or negative
        #[serde(rename = "elevationGainM")]
        elevation_gain_m: f64,
    },
}

impl ActivityDetails {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityDetails::Running { .. } => ActivityKind::Running,
            ActivityDetails::Cycling { .. } => ActivityKind::Cycling,
        }
    }
}

/// Derived performance metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// Minutes per kilometer (running)
    Pace(f64),
    /// Kilometers per hour (cycling)
    Speed(f64),
}

impl Metric {
    pub fn value(&self) -> f64 {
        match self {
            Metric::Pace(v) | Metric::Speed(v) => *v,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Pace(_) => "min/km",
            Metric::Speed(_) => "km/h",
        }
    }
}

/// Pace in min/km.
pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

/// Speed in km/h.
pub fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// Human-readable label such as "Running on April 14".
pub fn describe(kind: ActivityKind, created_at: DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), format_month_day(created_at))
}

/// Allocate an id from the creation timestamp.
///
/// Ids are the creation time in milliseconds, bumped forward when two
/// activities are created within the same millisecond so that every id
/// handed out by this process is distinct.
pub fn next_activity_id(created_at: DateTime<Utc>) -> String {
    let millis = created_at.timestamp_millis();
    let mut last = LAST_ACTIVITY_ID.load(Ordering::Relaxed);
    loop {
        let candidate = millis.max(last.saturating_add(1));
        match LAST_ACTIVITY_ID.compare_exchange_weak(
            last,
            candidate,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// Record an id that is already in use, typically one loaded from storage.
///
/// Later calls to [`next_activity_id`] return ids strictly greater than any
/// numeric id observed here. Non-numeric ids cannot collide and are ignored.
pub fn observe_activity_id(id: &str) {
    if let Ok(millis) = id.parse::<i64>() {
        LAST_ACTIVITY_ID.fetch_max(millis, Ordering::AcqRel);
    }
}

/// One logged activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredActivity", into = "StoredActivity")]
pub struct Activity {
    id: String,
    created_at: DateTime<Utc>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    details: ActivityDetails,
    description: String,
}

impl Activity {
    /// Create a running activity timestamped now.
    pub fn running(coords: Coords, distance_km: f64, duration_min: f64, cadence_spm: f64) -> Self {
        Self::new(
            Utc::now(),
            coords,
            distance_km,
            duration_min,
            ActivityDetails::Running { cadence_spm },
        )
    }

    /// Create a cycling activity timestamped now.
    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        Self::new(
            Utc::now(),
            coords,
            distance_km,
            duration_min,
            ActivityDetails::Cycling { elevation_gain_m },
        )
    }

    /// Create an activity with an explicit creation time.
    ///
    /// No validation happens here; callers check form input first.
    pub fn new(
        created_at: DateTime<Utc>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        details: ActivityDetails,
    ) -> Self {
        Self {
            id: next_activity_id(created_at),
            created_at,
            coords,
            distance_km,
            duration_min,
            description: describe(details.kind(), created_at),
            details,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn details(&self) -> ActivityDetails {
        self.details
    }

    pub fn kind(&self) -> ActivityKind {
        self.details.kind()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Pace or speed, recomputed from distance and duration.
    pub fn metric(&self) -> Metric {
        match self.details {
            ActivityDetails::Running { .. } => {
                Metric::Pace(pace_min_per_km(self.distance_km, self.duration_min))
            }
            ActivityDetails::Cycling { .. } => {
                Metric::Speed(speed_km_per_h(self.distance_km, self.duration_min))
            }
        }
    }

    pub fn pace_min_per_km(&self) -> Option<f64> {
        match self.metric() {
            Metric::Pace(p) => Some(p),
            Metric::Speed(_) => None,
        }
    }

    pub fn speed_km_per_h(&self) -> Option<f64> {
        match self.metric() {
            Metric::Speed(s) => Some(s),
            Metric::Pace(_) => None,
        }
    }
}

/// Storage representation of an [`Activity`].
///
/// The metric copies are written so the stored text is readable on its own,
/// but they are ignored when converting back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredActivity {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub coords: Coords,
    pub distance_km: f64,
    pub duration_min: f64,
    #[serde(flatten)]
    pub details: ActivityDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace_min_per_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_km_per_h: Option<f64>,
}

impl From<Activity> for StoredActivity {
    fn from(activity: Activity) -> Self {
        let pace_min_per_km = activity.pace_min_per_km();
        let speed_km_per_h = activity.speed_km_per_h();
        Self {
            id: activity.id,
            created_at: activity.created_at,
            coords: activity.coords,
            distance_km: activity.distance_km,
            duration_min: activity.duration_min,
            details: activity.details,
            description: Some(activity.description),
            pace_min_per_km,
            speed_km_per_h,
        }
    }
}

impl TryFrom<StoredActivity> for Activity {
    type Error = StoredActivityError;

    fn try_from(stored: StoredActivity) -> Result<Self, Self::Error> {
        if stored.id.trim().is_empty() {
            return Err(StoredActivityError::MissingId);
        }
        if !is_positive(stored.distance_km) {
            return Err(StoredActivityError::InvalidField("distanceKm"));
        }
        if !is_positive(stored.duration_min) {
            return Err(StoredActivityError::InvalidField("durationMin"));
        }
        match stored.details {
            ActivityDetails::Running { cadence_spm } if !is_positive(cadence_spm) => {
                return Err(StoredActivityError::InvalidField("cadenceSpm"));
            }
            ActivityDetails::Cycling { elevation_gain_m } if !elevation_gain_m.is_finite() => {
                return Err(StoredActivityError::InvalidField("elevationGainM"));
            }
            _ => {}
        }

        let description = stored
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| describe(stored.details.kind(), stored.created_at));

        Ok(Self {
            id: stored.id,
            created_at: stored.created_at,
            coords: stored.coords,
            distance_km: stored.distance_km,
            duration_min: stored.duration_min,
            details: stored.details,
            description,
        })
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Reasons a stored record cannot be turned back into an [`Activity`].
#[derive(Debug, thiserror::Error)]
pub enum StoredActivityError {
    #[error("Stored activity has no id")]
    MissingId,

    #[error("Stored activity has invalid {0}")]
    InvalidField(&'static str),
}
