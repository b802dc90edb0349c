use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::city_info::repo::{CitiesDataStore, InMemoryRepositoryFactory};
use service::mail::mock::RecordingMailService;
use tower::ServiceExt;

use server::{routes, AppState};

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

fn memory_app() -> (Router, Arc<RecordingMailService>) {
    let factory = Arc::new(InMemoryRepositoryFactory::new(Arc::new(CitiesDataStore::seeded())));
    let mail = Arc::new(RecordingMailService::default());
    let state = AppState::new(factory, mail.clone());
    (routes::build_router(state, cors()), mail)
}

async fn sqlite_app() -> anyhow::Result<Router> {
    let cfg = configs::from_toml_str(
        r#"
        [repository]
        backend = "database"

        [database]
        url = "sqlite::memory:"
        max_connections = 1
        min_connections = 1
        "#,
    )?;
    let state = server::build_state(&cfg).await?;
    Ok(routes::build_router(state, cors()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, axum::http::HeaderMap, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&v)?)
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body)?).await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, headers, json))
}

#[tokio::test]
async fn get_seeded_point_of_interest() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let (status, _, body) = send(&app, "GET", "/api/cities/1/pointsofinterest/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "name": "Central Park", "description": "The most visited urban park in the US."})
    );

    let (status, _, body) = send(&app, "GET", "/api/cities/999/pointsofinterest/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    Ok(())
}

#[tokio::test]
async fn cities_list_and_detail() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let (status, _, body) = send(&app, "GET", "/api/cities", None).await?;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body.as_array().unwrap().iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Antwerp", "New York City", "Paris"]);
    assert!(body[0].get("pointsOfInterest").is_none());

    let (_, _, body) = send(&app, "GET", "/api/cities/3?includePointsOfInterest=true", None).await?;
    assert_eq!(body["pointsOfInterest"].as_array().unwrap().len(), 2);
    let (_, _, body) = send(&app, "GET", "/api/cities/3", None).await?;
    assert!(body.get("pointsOfInterest").is_none());
    Ok(())
}

#[tokio::test]
async fn create_returns_location_of_new_point() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let (status, headers, body) = send(
        &app,
        "POST",
        "/api/cities/2/pointsofinterest",
        Some(json!({"name": "Rubenshuis", "description": "Home and studio of Rubens."})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 7);
    assert_eq!(headers[header::LOCATION], "/api/cities/2/pointsofinterest/7");

    let (status, _, fetched) = send(&app, "GET", "/api/cities/2/pointsofinterest/7", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
    Ok(())
}

#[tokio::test]
async fn create_with_name_equal_description_is_rejected() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let (status, _, body) =
        send(&app, "POST", "/api/cities/1/pointsofinterest", Some(json!({"name": "X", "description": "X"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["description"][0], "The provided description should be different from the name.");

    let (_, _, list) = send(&app, "GET", "/api/cities/1/pointsofinterest", None).await?;
    assert_eq!(list.as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn create_in_missing_city_is_not_found() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let (status, _, _) =
        send(&app, "POST", "/api/cities/999/pointsofinterest", Some(json!({"name": "A", "description": "B"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn put_replaces_point() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let (status, _, _) = send(
        &app,
        "PUT",
        "/api/cities/1/pointsofinterest/2",
        Some(json!({"name": "Empire State", "description": "Art Deco."})),
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, _, body) = send(&app, "GET", "/api/cities/1/pointsofinterest/2", None).await?;
    assert_eq!(body["name"], "Empire State");

    let (status, _, body) = send(&app, "PUT", "/api/cities/1/pointsofinterest/2", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["name"].is_array());
    Ok(())
}

#[tokio::test]
async fn patch_is_atomic() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let uri = "/api/cities/1/pointsofinterest/1";
    let (status, _, _) = send(
        &app,
        "PATCH",
        uri,
        Some(json!([{"op": "replace", "path": "/name", "value": "Updated - Central Park"}])),
    )
    .await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(
        &app,
        "PATCH",
        uri,
        Some(json!([
            {"op": "replace", "path": "/name", "value": "Same"},
            {"op": "replace", "path": "/description", "value": "Same"}
        ])),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, "GET", uri, None).await?;
    assert_eq!(body["name"], "Updated - Central Park");
    assert_eq!(body["description"], "The most visited urban park in the US.");

    let (status, _, _) =
        send(&app, "PATCH", "/api/cities/1/pointsofinterest/42", Some(json!([{"op": "bogus", "path": "/x"}]))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_removes_point_and_notifies_once() -> anyhow::Result<()> {
    let (app, mail) = memory_app();
    let (status, _, _) = send(&app, "DELETE", "/api/cities/3/pointsofinterest/5", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(&app, "GET", "/api/cities/3/pointsofinterest/5", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = send(&app, "DELETE", "/api/cities/3/pointsofinterest/5", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let sent = mail.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "Point of interest Eiffel Tower with id 5 was deleted.");
    Ok(())
}

#[tokio::test]
async fn non_numeric_ids_are_bad_requests() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/api/cities/abc/pointsofinterest").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_public() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let (status, _, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let (status, _, body) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/cities"].is_object());
    Ok(())
}

#[tokio::test]
async fn sqlite_backend_serves_the_same_contract() -> anyhow::Result<()> {
    let app = sqlite_app().await?;
    let (status, _, body) = send(&app, "GET", "/api/cities/1/pointsofinterest/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Central Park");

    let (status, headers, created) = send(
        &app,
        "POST",
        "/api/cities/1/pointsofinterest",
        Some(json!({"name": "High Line", "description": "An elevated linear park."})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 7);
    assert_eq!(headers[header::LOCATION], "/api/cities/1/pointsofinterest/7");

    let (status, _, _) = send(
        &app,
        "PATCH",
        "/api/cities/1/pointsofinterest/7",
        Some(json!([{"op": "replace", "path": "/description", "value": "High Line"}])),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = send(&app, "DELETE", "/api/cities/1/pointsofinterest/7", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = send(&app, "GET", "/api/cities/1/pointsofinterest/7", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_structured_validation_errors() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let uri = "/api/cities/1/pointsofinterest/1";

    let (status, _, body) =
        send(&app, "PATCH", uri, Some(json!([{"path": "/name", "value": "x"}]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["body"][0].as_str().unwrap().contains("op"));

    let (status, _, body) =
        send(&app, "PATCH", uri, Some(json!({"op": "replace", "path": "/name", "value": "x"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["errors"]["body"].is_array());

    let (status, _, body) = send(
        &app,
        "POST",
        "/api/cities/1/pointsofinterest",
        Some(json!({"name": 5, "description": "A number."})),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["body"].is_array());

    let (status, _, body) =
        send(&app, "PUT", uri, Some(json!({"name": ["Central Park"], "description": null}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["body"].is_array());

    let (_, _, unchanged) = send(&app, "GET", uri, None).await?;
    assert_eq!(unchanged["name"], "Central Park");
    Ok(())
}

#[tokio::test]
async fn malformed_patch_of_missing_point_is_not_found() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let (status, _, _) =
        send(&app, "PATCH", "/api/cities/1/pointsofinterest/42", Some(json!({"op": "replace"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn patch_without_value_keeps_description() -> anyhow::Result<()> {
    let (app, _) = memory_app();
    let uri = "/api/cities/1/pointsofinterest/1";
    let (status, _, body) =
        send(&app, "PATCH", uri, Some(json!([{"op": "replace", "path": "/description"}]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["description"].is_array());

    let (_, _, point) = send(&app, "GET", uri, None).await?;
    assert_eq!(point["description"], "The most visited urban park in the US.");
    Ok(())
}
