// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP API tests covering the click → submit → render → persist flow.

use axum::http::StatusCode;
use mapty_tracker::config::Config;
use mapty_tracker::services::{KeyValueStore, STORAGE_KEY};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, create_test_app_with, empty_request, json_request, HOME};

#[tokio::test]
async fn test_health() {
    let (app, _state, _store) = create_test_app().await;

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_initial_state() {
    let (app, _state, _store) = create_test_app().await;

    let response = app.oneshot(empty_request("GET", "/api/state")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["form"]["visible"], false);
    assert_eq!(body["form"]["kind"], "running");
    assert_eq!(body["form"]["variant_field"], "cadence");
    assert_eq!(body["map"]["center"]["lat"], HOME.lat);
    assert_eq!(body["map"]["zoom"], 13);
    assert_eq!(body["map"]["marker_count"], 0);
    assert_eq!(body["list"], json!([]));
}

#[tokio::test]
async fn test_log_activity_flow() {
    let (app, _state, store) = create_test_app().await;

    // Click the map
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/map/click",
            json!({ "lat": 37.39, "lng": -122.08 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let form = body_json(response).await;
    assert_eq!(form["visible"], true);
    assert_eq!(form["focused"], "distance");

    // Switch to cycling
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/form/type",
            json!({ "kind": "cycling" }),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["variant_field"], "elevation");

    // Submit with values as typed into the inputs
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/form/submit",
            json!({ "kind": "cycling", "distance": "20", "duration": "60", "elevation": "250" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let activity = body_json(response).await;
    assert_eq!(activity["kind"], "cycling");
    assert_eq!(activity["speed_km_per_h"], 20.0);
    assert_eq!(activity["elevation_gain_m"], 250.0);
    let id = activity["id"].as_str().unwrap().to_string();

    // Persisted
    let stored = store.get_item(STORAGE_KEY).unwrap().expect("slot written");
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored[0]["id"], id.as_str());
    assert_eq!(stored[0]["kind"], "cycling");
    assert_eq!(stored[0]["elevationGainM"], 250.0);

    // Rendered in list and on the map; form hidden again
    let state = body_json(
        app.clone()
            .oneshot(empty_request("GET", "/api/state"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(state["form"]["visible"], false);
    assert_eq!(state["list"][0]["id"], id.as_str());
    assert!(state["list"][0]["html"]
        .as_str()
        .unwrap()
        .contains("workout--cycling"));
    assert_eq!(state["map"]["marker_count"], 1);

    let markers = body_json(
        app.clone()
            .oneshot(empty_request("GET", "/api/map/markers"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(markers["features"][0]["geometry"]["coordinates"], json!([-122.08, 37.39]));
    assert_eq!(
        markers["features"][0]["properties"]["popupClass"],
        "cycling-popup"
    );

    let activities = body_json(
        app.clone()
            .oneshot(empty_request("GET", "/api/activities"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(activities["total"], 1);

    // List click re-centres on the activity
    let response = app
        .clone()
        .oneshot(empty_request("POST", &format!("/api/activities/{}/focus", id)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["centered"], true);

    let state = body_json(
        app.oneshot(empty_request("GET", "/api/state"))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(state["map"]["center"], json!({ "lat": 37.39, "lng": -122.08 }));
    assert_eq!(state["map"]["animate"], true);
}

#[tokio::test]
async fn test_submit_without_click_conflicts() {
    let (app, _state, store) = create_test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/form/submit",
            json!({ "kind": "running", "distance": 5, "duration": 30, "cadence": 170 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "form_not_open");
    assert_eq!(store.get_item(STORAGE_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_invalid_submit_returns_alert_and_keeps_form_open() {
    let (app, state, store) = create_test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/map/click",
            json!({ "lat": 1.0, "lng": 2.0 }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/form/submit",
            json!({ "kind": "running", "distance": "-5", "duration": "30", "cadence": "170" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "Inputs have to be positive numbers!");

    let controller = state.controller.lock().await;
    assert!(controller.form().is_visible());
    assert!(controller.activities().is_empty());
    assert_eq!(store.get_item(STORAGE_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_focus_unknown_id_is_noop() {
    let (app, _state, _store) = create_test_app().await;

    let response = app
        .oneshot(empty_request("POST", "/api/activities/12345/focus"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["centered"], false);
}

#[tokio::test]
async fn test_get_activity_by_id() {
    let (app, _state, _store) = create_test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/map/click",
            json!({ "lat": 1.0, "lng": 2.0 }),
        ))
        .await
        .unwrap();
    let created = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/form/submit",
                json!({ "kind": "running", "distance": "5", "duration": "30", "cadence": "170" }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/api/activities/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["pace_min_per_km"], 6.0);

    let response = app
        .oneshot(empty_request("GET", "/api/activities/12345"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["details"], "Activity 12345");
}

#[tokio::test]
async fn test_map_click_without_position() {
    let (app, _state, _store) = create_test_app_with(Config {
        home_position: None,
        geolocation_url: None,
        ..Config::default()
    })
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/map/click",
            json!({ "lat": 1.0, "lng": 2.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "map_unavailable");

    let state = body_json(app.oneshot(empty_request("GET", "/api/state")).await.unwrap()).await;
    assert!(state["map"].is_null());
}

#[tokio::test]
async fn test_reset_storage() {
    let (app, state, store) = create_test_app().await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/api/map/click",
            json!({ "lat": 1.0, "lng": 2.0 }),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/form/submit",
            json!({ "kind": "running", "distance": "5", "duration": "30", "cadence": "170" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(store.get_item(STORAGE_KEY).unwrap().is_some());

    let response = app
        .oneshot(empty_request("DELETE", "/api/storage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    assert_eq!(store.get_item(STORAGE_KEY).unwrap(), None);
    let controller = state.controller.lock().await;
    assert!(controller.activities().is_empty());
    assert_eq!(controller.map().unwrap().markers().len(), 0);
}

#[tokio::test]
async fn test_security_headers_present() {
    let (app, _state, _store) = create_test_app().await;

    let response = app.oneshot(empty_request("GET", "/api/state")).await.unwrap();
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
}
