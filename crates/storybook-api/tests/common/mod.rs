//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use storybook_core::generator::StoryGenerator;
use storybook_generation::MockStoryGenerator;
use storybook_pdf::StoryAssembler;
use storybook_test_support::{FixedClock, StaticImageFetcher};
use tower::ServiceExt;

use storybook_api::app;
use storybook_api::state::AppState;

/// Application state with the mock story generator, mock images, a fixed
/// clock, and an image fetcher that knows no URLs.
pub fn test_app_state() -> AppState {
    app_state_with(Arc::new(MockStoryGenerator), StaticImageFetcher::default())
}

/// Application state around the given story generator and image fetcher.
pub fn app_state_with(
    story_generator: Arc<dyn StoryGenerator>,
    fetcher: StaticImageFetcher,
) -> AppState {
    let assembler = StoryAssembler::new(Arc::new(fetcher), Arc::new(FixedClock::default()));
    AppState::new(story_generator, assembler).with_mock_images(true)
}

/// Build the full app router. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> Router {
    app(test_app_state())
}

/// Send a POST request with a JSON body and return the raw response parts.
pub async fn post_raw(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, headers, body_bytes.to_vec())
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, _, bytes) = post_raw(app, uri, body).await;
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
