//! Routes for story text and illustration generation.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use storybook_core::error::DomainError;
use storybook_core::request::{ImagesRequest, ImagesResponse, StoryRequest};
use storybook_core::story::Story;
use storybook_generation::{fallback_story, illustrate_story, mock_illustrations};
use tracing::{info, instrument, warn};

use crate::error::ApiError;
use crate::routes::parse_json;
use crate::state::AppState;

/// Response header marking a fallback story.
pub const FALLBACK_HEADER: &str = "x-fallback";

async fn try_generate_story(state: &AppState, body: &[u8]) -> Result<Story, DomainError> {
    let request: StoryRequest = parse_json(body)?;
    request.validate()?;
    info!(age = request.age, minutes = request.minutes, "generating story");
    state.story_generator.generate(&request).await
}

/// POST /story
#[instrument(skip_all)]
async fn generate_story(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    match try_generate_story(&state, &body).await {
        Ok(story) => Ok(Json(story).into_response()),
        Err(error) if state.story_fallback => {
            warn!(%error, "story generation failed; serving fallback story");
            Ok(([(FALLBACK_HEADER, "true")], Json(fallback_story())).into_response())
        }
        Err(error) => Err(error.into()),
    }
}

/// POST /images
#[instrument(skip_all)]
async fn generate_images(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImagesResponse>, ApiError> {
    let request: ImagesRequest = parse_json(&body)?;
    request.validate()?;

    if state.mock_images {
        info!(pages = request.story.pages.len(), "serving mock illustrations");
        return Ok(Json(ImagesResponse {
            images: mock_illustrations(&request.story),
        }));
    }

    let generator = state.image_generator(request.ai_model)?;
    info!(model = %generator.model(), requested = ?request.ai_model, "illustrating story");
    let images = illustrate_story(
        generator.as_ref(),
        &request.story,
        &request.illustration_style,
        request.child_name.as_deref(),
    )
    .await;

    Ok(Json(ImagesResponse { images }))
}

/// Returns the router for the generation endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/story", post(generate_story))
        .route("/images", post(generate_images))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use storybook_core::generator::{ImageModel, StoryGenerator};
    use storybook_generation::MockStoryGenerator;
    use storybook_pdf::StoryAssembler;
    use storybook_test_support::{
        FailingImageGenerator, FailingStoryGenerator, FixedClock, RecordingImageGenerator,
        StaticImageFetcher, sample_story,
    };
    use tower::ServiceExt;

    fn app_state_with(story_generator: Arc<dyn StoryGenerator>) -> AppState {
        let assembler = StoryAssembler::new(
            Arc::new(StaticImageFetcher::default()),
            Arc::new(FixedClock::default()),
        );
        AppState::new(story_generator, assembler)
    }

    fn story_body() -> Value {
        json!({
            "childName": "Ana",
            "age": 5,
            "pronouns": "she/her",
            "minutes": 5,
            "topic": "Kindness",
            "illustrationStyle": "warm watercolor"
        })
    }

    async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Option<String>, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        let status = response.status();
        let fallback = response
            .headers()
            .get(FALLBACK_HEADER)
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, fallback, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_generate_story_returns_200_with_story() {
        // Arrange
        let app = router().with_state(app_state_with(Arc::new(MockStoryGenerator)));

        // Act
        let (status, fallback, json) = post_json(app, "/story", &story_body()).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback, None);
        assert_eq!(json["title"], "Ana's Kindness Adventure");
        assert_eq!(json["pages"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_generate_story_falls_back_when_generator_fails() {
        let app = router().with_state(app_state_with(Arc::new(FailingStoryGenerator)));

        let (status, fallback, json) = post_json(app, "/story", &story_body()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback.as_deref(), Some("true"));
        assert_eq!(json["title"], "A Cozy Night of Kindness");
    }

    #[tokio::test]
    async fn test_generate_story_falls_back_on_invalid_input() {
        let app = router().with_state(app_state_with(Arc::new(MockStoryGenerator)));

        let (status, fallback, _) = post_json(app, "/story", &json!({ "age": 99 })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(fallback.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_generate_story_returns_400_for_invalid_input_without_fallback() {
        let state = app_state_with(Arc::new(MockStoryGenerator)).with_story_fallback(false);
        let app = router().with_state(state);
        let mut body = story_body();
        body["age"] = json!(11);

        let (status, fallback, json) = post_json(app, "/story", &body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(fallback, None);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_generate_story_returns_502_for_upstream_failure_without_fallback() {
        let state = app_state_with(Arc::new(FailingStoryGenerator)).with_story_fallback(false);
        let app = router().with_state(state);

        let (status, _, json) = post_json(app, "/story", &story_body()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "upstream_error");
    }

    #[tokio::test]
    async fn test_generate_images_uses_requested_backend() {
        // Arrange
        let gemini = Arc::new(RecordingImageGenerator::new(ImageModel::GoogleNanoBanana));
        let state = app_state_with(Arc::new(MockStoryGenerator))
            .with_image_generator(Arc::new(RecordingImageGenerator::new(
                ImageModel::OpenAiDalle3,
            )))
            .with_image_generator(gemini.clone());
        let app = router().with_state(state);
        let body = json!({
            "story": sample_story(8),
            "illustrationStyle": "pastel",
            "childName": "Ana",
            "aiModel": "google-nano-banana"
        });

        // Act
        let (status, _, json) = post_json(app, "/images", &body).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let images = json["images"].as_array().unwrap();
        assert_eq!(images.len(), 8);
        assert_eq!(images[0], "https://images.test/google-nano-banana/1.png");
        assert_eq!(gemini.prompts().len(), 8);
    }

    #[tokio::test]
    async fn test_generate_images_returns_placeholders_when_backend_fails() {
        let state = app_state_with(Arc::new(MockStoryGenerator))
            .with_image_generator(Arc::new(FailingImageGenerator(ImageModel::OpenAiDalle3)));
        let app = router().with_state(state);
        let body = json!({ "story": sample_story(8), "illustrationStyle": "pastel" });

        let (status, _, json) = post_json(app, "/images", &body).await;

        assert_eq!(status, StatusCode::OK);
        assert!(
            json["images"]
                .as_array()
                .unwrap()
                .iter()
                .all(|i| i.as_str().unwrap().starts_with("data:image/svg+xml;"))
        );
    }

    #[tokio::test]
    async fn test_generate_images_serves_mock_cards() {
        let state = app_state_with(Arc::new(MockStoryGenerator)).with_mock_images(true);
        let app = router().with_state(state);
        let body = json!({ "story": sample_story(9), "illustrationStyle": "pastel" });

        let (status, _, json) = post_json(app, "/images", &body).await;

        assert_eq!(status, StatusCode::OK);
        let images = json["images"].as_array().unwrap();
        assert_eq!(images.len(), 9);
        assert!(images[8].as_str().unwrap().contains("Mock%20Image%209"));
    }

    #[tokio::test]
    async fn test_generate_images_returns_400_for_invalid_story() {
        let state = app_state_with(Arc::new(MockStoryGenerator)).with_mock_images(true);
        let app = router().with_state(state);
        let body = json!({ "story": sample_story(2), "illustrationStyle": "pastel" });

        let (status, _, json) = post_json(app, "/images", &body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_generate_images_returns_400_for_unconfigured_backend() {
        let app = router().with_state(app_state_with(Arc::new(MockStoryGenerator)));
        let body = json!({ "story": sample_story(8), "illustrationStyle": "pastel" });

        let (status, _, json) = post_json(app, "/images", &body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("openai-dalle3"));
    }
}
