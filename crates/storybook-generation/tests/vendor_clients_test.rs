//! Integration tests for the vendor clients against a local stub API.

mod common;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use reqwest::Client;
use serde_json::{Value, json};
use storybook_core::error::DomainError;
use storybook_core::generator::{ImageGenerator, StoryGenerator};
use storybook_core::request::{Pronouns, StoryRequest};
use storybook_generation::{GeminiImageGenerator, OpenAiImageGenerator, OpenAiStoryGenerator};
use storybook_test_support::sample_story;

fn story_request() -> StoryRequest {
    StoryRequest {
        child_name: "Ana".into(),
        age: 5,
        pronouns: Pronouns::SheHer,
        minutes: 5,
        topic: "kindness".into(),
        illustration_style: "warm watercolor".into(),
    }
}

#[tokio::test]
async fn test_openai_story_round_trip() {
    // Arrange
    let content = serde_json::to_string(&sample_story(10)).unwrap();
    let router = Router::new().route(
        "/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let content = content.clone();
            async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["model"], "gpt-4o-mini");
                assert_eq!(body["messages"][0]["role"], "system");
                assert!(
                    body["messages"][1]["content"]
                        .as_str()
                        .unwrap()
                        .contains("Child: Ana (she/her)")
                );
                Json(json!({ "choices": [{ "message": { "content": content } }] }))
            }
        }),
    );
    let base_url = common::serve(router).await;
    let generator = OpenAiStoryGenerator::new(Client::new(), "sk-test").with_base_url(base_url);

    // Act
    let story = generator.generate(&story_request()).await.unwrap();

    // Assert
    assert_eq!(story.title, "Ana's Kindness Adventure");
    assert_eq!(story.pages.len(), 10);
}

#[tokio::test]
async fn test_openai_error_status_is_upstream_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    );
    let base_url = common::serve(router).await;
    let generator = OpenAiStoryGenerator::new(Client::new(), "sk-test").with_base_url(base_url);

    let result = generator.generate(&story_request()).await;

    assert!(matches!(result, Err(DomainError::Upstream(ref m)) if m.contains("429")));
}

#[tokio::test]
async fn test_dalle_returns_first_url() {
    let router = Router::new().route(
        "/images/generations",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["model"], "dall-e-3");
            assert_eq!(body["size"], "1024x1024");
            assert_eq!(body["response_format"], "url");
            Json(json!({ "data": [{ "url": "https://cdn.test/ana-1.png" }] }))
        }),
    );
    let base_url = common::serve(router).await;
    let generator = OpenAiImageGenerator::new(Client::new(), "sk-test").with_base_url(base_url);

    let url = generator.generate_image("a kind girl").await.unwrap();

    assert_eq!(url, "https://cdn.test/ana-1.png");
}

#[tokio::test]
async fn test_dalle_without_url_is_upstream_error() {
    let router = Router::new().route(
        "/images/generations",
        post(|| async { Json(json!({ "data": [{ "b64_json": "AAAA" }] })) }),
    );
    let base_url = common::serve(router).await;
    let generator = OpenAiImageGenerator::new(Client::new(), "sk-test").with_base_url(base_url);

    let result = generator.generate_image("a kind girl").await;

    assert!(matches!(result, Err(DomainError::Upstream(_))));
}

#[tokio::test]
async fn test_gemini_inline_image_round_trip() {
    let router = Router::new().route(
        "/models/{model}",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(headers["x-goog-api-key"], "g-test");
            assert!(
                body["contents"][0]["parts"][0]["text"]
                    .as_str()
                    .unwrap()
                    .starts_with("Generate a children's book illustration: ")
            );
            Json(json!({ "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
            ]}}]}))
        }),
    );
    let base_url = common::serve(router).await;
    let generator = GeminiImageGenerator::new(Client::new(), "g-test", "gemini-2.0-flash-exp")
        .with_base_url(base_url);

    let image = generator.generate_image("a kind girl").await.unwrap();

    assert_eq!(image, "data:image/png;base64,iVBORw0KGgo=");
}
