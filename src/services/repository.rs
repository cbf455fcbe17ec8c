// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity list persistence on a single storage slot.
//!
//! The slot holds a JSON array of stored activities. Loading rebuilds typed
//! [`Activity`] values record by record, so the variant and its derived
//! metric come back from the `kind` tag and the raw numbers rather than from
//! whatever was stored alongside them.

use std::collections::HashSet;

use crate::models::Activity;
use crate::services::storage::{KeyValueStore, StorageError};

/// Name of the storage slot holding the activity list.
pub const STORAGE_KEY: &str = "workouts";

/// Persistence adapter for the activity list.
#[derive(Debug, Clone)]
pub struct ActivityRepository<S> {
    store: S,
}

impl<S: KeyValueStore> ActivityRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize the full list and overwrite the slot.
    pub fn save(&self, activities: &[Activity]) -> Result<(), StorageError> {
        let json = serde_json::to_string(activities)?;
        self.store.set_item(STORAGE_KEY, &json)?;
        tracing::debug!(count = activities.len(), "Saved activities");
        Ok(())
    }

    /// Read the slot back into activities.
    ///
    /// A missing, unreadable or malformed slot yields an empty list. Records
    /// that fail to convert, and records repeating an earlier id, are skipped.
    pub fn load(&self) -> Vec<Activity> {
        let raw = match self.store.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored activities");
                return Vec::new();
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "Stored activities are not a JSON array");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut activities = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Activity>(record) {
                Ok(activity) => {
                    if seen.insert(activity.id().to_string()) {
                        activities.push(activity);
                    } else {
                        tracing::warn!(
                            index,
                            id = activity.id(),
                            "Skipping stored activity with duplicate id"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping invalid stored activity");
                }
            }
        }

        tracing::info!(count = activities.len(), "Loaded stored activities");
        activities
    }

    /// Erase the slot.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove_item(STORAGE_KEY)
    }
}
