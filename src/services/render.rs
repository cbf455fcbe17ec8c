// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML fragments for list entries and map popups.

use crate::models::{Activity, ActivityDetails};
use crate::services::map::MapAdapter;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Popup text: kind emoji followed by the description.
pub fn popup_content(activity: &Activity) -> String {
    format!(
        "{} {}",
        activity.kind().emoji(),
        escape_html(activity.description())
    )
}

/// CSS class tagging the popup with the activity kind.
pub fn popup_class(activity: &Activity) -> String {
    format!("{}-popup", activity.kind())
}

/// Place the marker for `activity` on `map`.
pub fn place_activity_marker<M: MapAdapter>(map: &mut M, activity: &Activity) {
    map.place_marker(
        activity.coords(),
        &popup_content(activity),
        &popup_class(activity),
    );
}

fn detail(icon: &str, value: impl std::fmt::Display, unit: &str) -> String {
    format!(
        r#"
  <div class="workout__details">
    <span class="workout__icon">{icon}</span>
    <span class="workout__value">{value}</span>
    <span class="workout__unit">{unit}</span>
  </div>"#
    )
}

/// The `<li>` entry shown in the activity list.
pub fn list_entry_html(activity: &Activity) -> String {
    let kind = activity.kind();
    let metric = activity.metric();

    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}">
  <h2 class="workout__title">{description}</h2>"#,
        id = escape_html(activity.id()),
        description = escape_html(activity.description()),
    );
    html.push_str(&detail(kind.emoji(), activity.distance_km(), "km"));
    html.push_str(&detail("⏱", activity.duration_min(), "min"));
    html.push_str(&detail(
        "⚡️",
        format!("{:.1}", metric.value()),
        metric.unit(),
    ));
    match activity.details() {
        ActivityDetails::Running { cadence_spm } => {
            html.push_str(&detail("🦶🏼", cadence_spm, "spm"));
        }
        ActivityDetails::Cycling { elevation_gain_m } => {
            html.push_str(&detail("⛰", elevation_gain_m, "m"));
        }
    }
    html.push_str("\n</li>");
    html
}
