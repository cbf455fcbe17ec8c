// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod form;

pub use activity::{Activity, ActivityDetails, ActivityKind, Coords, Metric, StoredActivity};
pub use form::{ActivityInput, EntryForm, FieldValue, FormFields, FormInput, FormState};
