// Shared test utilities for integration tests
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use fyyur_db::sea_orm::DatabaseConnection;
use fyyur_db::{connect, AppState, DatabaseConfig};
use fyyur_migration::{Migrator, MigratorTrait};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const PAST: &str = "2019-05-21 21:30:00";
pub const FUTURE: &str = "2099-04-01 20:00:00";

/// Router over a fresh in-memory database, plus a handle for seeding
pub async fn test_app() -> (Router, DatabaseConnection) {
    let db = connect(&DatabaseConfig::in_memory())
        .await
        .expect("failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    let app = fyyur_server::app(Arc::new(AppState { db: db.clone() }));
    (app, db)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

/// POST with a body that is sent as-is, decodable or not
pub async fn post_raw(app: &Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn create_venue(app: &Router, name: &str, city: &str, state: &str) {
    let resp = post_json(app, "/venues/create", venue_json(name, city, state)).await;
    assert_eq!(resp.status(), axum::http::StatusCode::OK);
}

pub async fn create_artist(app: &Router, name: &str) {
    let resp = post_json(app, "/artists/create", artist_json(name)).await;
    assert_eq!(resp.status(), axum::http::StatusCode::OK);
}

pub fn venue_json(name: &str, city: &str, state: &str) -> Value {
    serde_json::json!({
        "name": name,
        "city": city,
        "state": state,
        "address": "1015 Folsom Street",
        "phone": "123-123-1234",
        "genres": ["Jazz", "Reggae", "Swing"],
        "image_link": "https://images.example.com/venue.jpg",
        "facebook_link": "https://www.facebook.com/TheMusicalHop",
    })
}

pub fn artist_json(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "city": "San Francisco",
        "state": "CA",
        "genres": ["Rock n Roll"],
        "image_link": "https://images.example.com/artist.jpg",
    })
}
