//! PDF export route.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Router, routing::post};
use storybook_core::story::Story;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::routes::parse_json;
use crate::state::AppState;

/// Largest accepted story body. Embedded base64 illustrations make export
/// payloads far larger than axum's 2 MB default.
pub const MAX_EXPORT_BODY_BYTES: usize = 64 * 1024 * 1024;

/// POST /pdf
#[instrument(skip_all)]
async fn export_pdf(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let story: Story = parse_json(&body)?;
    story.validate()?;

    let rendered = state.assembler.assemble(&story).await?;
    info!(
        pages = rendered.page_count,
        bytes = rendered.bytes.len(),
        filename = %rendered.filename,
        "pdf exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", rendered.filename),
            ),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        rendered.bytes,
    ))
}

/// Returns the router for the export endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pdf", post(export_pdf))
        .layer(DefaultBodyLimit::max(MAX_EXPORT_BODY_BYTES))
}
