// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Entry form state and input validation.

use chrono::Utc;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::activity::{Activity, ActivityDetails, ActivityKind, Coords};

/// Alert text shown when a submitted form is rejected.
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";

/// Visibility of the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FormState {
    #[default]
    Hidden,
    /// Opened by a map click at `pending`.
    Visible { pending: Coords },
}

/// Form inputs that can hold focus or be hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl FormInput {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormInput::Distance => "distance",
            FormInput::Duration => "duration",
            FormInput::Cadence => "cadence",
            FormInput::Elevation => "elevation",
        }
    }

    /// The variant-specific input shown for `kind`.
    pub fn variant_field(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Running => FormInput::Cadence,
            ActivityKind::Cycling => FormInput::Elevation,
        }
    }
}

/// Presentational state of the entry form.
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    state: FormState,
    kind: ActivityKind,
    focused: Option<FormInput>,
}

impl EntryForm {
    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, FormState::Visible { .. })
    }

    /// Coordinates of the map click that opened the form.
    pub fn pending_coords(&self) -> Option<Coords> {
        match self.state {
            FormState::Visible { pending } => Some(pending),
            FormState::Hidden => None,
        }
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn focused(&self) -> Option<FormInput> {
        self.focused
    }

    /// Which of cadence/elevation is currently shown.
    pub fn visible_variant_field(&self) -> FormInput {
        FormInput::variant_field(self.kind)
    }

    /// Open the form for a click at `coords` and focus the distance input.
    ///
    /// A second click while open just moves the pending location.
    pub fn show(&mut self, coords: Coords) {
        self.state = FormState::Visible { pending: coords };
        self.focused = Some(FormInput::Distance);
    }

    /// Switch the variant-specific input to match `kind`.
    pub fn select_kind(&mut self, kind: ActivityKind) {
        self.kind = kind;
    }

    /// Clear inputs and hide.
    pub fn hide_and_reset(&mut self) {
        *self = Self::default();
    }
}

/// A form value as typed into an input: either already numeric or raw text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric value; text that does not parse is NaN.
    pub fn to_f64(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

fn field_to_f64(field: Option<&FieldValue>) -> f64 {
    field.map(FieldValue::to_f64).unwrap_or(f64::NAN)
}

/// Raw submitted form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct FormFields {
    pub kind: ActivityKind,
    #[serde(default)]
    pub distance: Option<FieldValue>,
    #[serde(default)]
    pub duration: Option<FieldValue>,
    #[serde(default)]
    pub cadence: Option<FieldValue>,
    #[serde(default)]
    pub elevation: Option<FieldValue>,
}

impl FormFields {
    /// Parse into numbers. Only the input matching `kind` is read.
    pub fn parse(&self) -> ActivityInput {
        let (cadence_spm, elevation_gain_m) = match self.kind {
            ActivityKind::Running => (Some(field_to_f64(self.cadence.as_ref())), None),
            ActivityKind::Cycling => (None, Some(field_to_f64(self.elevation.as_ref()))),
        };
        ActivityInput {
            kind: self.kind,
            distance_km: field_to_f64(self.distance.as_ref()),
            duration_min: field_to_f64(self.duration.as_ref()),
            cadence_spm,
            elevation_gain_m,
        }
    }
}

/// Parsed form input, checked before an [`Activity`] is built.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ActivityInput {
    pub kind: ActivityKind,
    #[validate(custom(function = "positive_finite"))]
    pub distance_km: f64,
    #[validate(custom(function = "positive_finite"))]
    pub duration_min: f64,
    #[validate(custom(function = "positive_finite"))]
    pub cadence_spm: Option<f64>,
    #[validate(custom(function = "finite"))]
    pub elevation_gain_m: Option<f64>,
}

impl ActivityInput {
    /// Validate and build the activity at `coords`.
    pub fn into_activity(self, coords: Coords) -> Result<Activity, InputError> {
        self.validate()?;
        let details = self
            .details()
            .ok_or(InputError::MissingVariantField(self.kind))?;
        Ok(Activity::new(
            Utc::now(),
            coords,
            self.distance_km,
            self.duration_min,
            details,
        ))
    }

    /// Variant payload this input would produce, if complete.
    pub fn details(&self) -> Option<ActivityDetails> {
        match self.kind {
            ActivityKind::Running => self
                .cadence_spm
                .map(|cadence_spm| ActivityDetails::Running { cadence_spm }),
            ActivityKind::Cycling => self
                .elevation_gain_m
                .map(|elevation_gain_m| ActivityDetails::Cycling { elevation_gain_m }),
        }
    }
}

fn positive_finite<T: std::borrow::Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    let value = value.borrow();
    if value.is_finite() && *value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("positive_finite"))
    }
}

fn finite<T: std::borrow::Borrow<f64>>(value: T) -> Result<(), ValidationError> {
    let value = value.borrow();
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("finite"))
    }
}

/// Rejected form input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("invalid fields: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("missing {0} field")]
    MissingVariantField(ActivityKind),
}
