//! Turning a page's image reference into something drawable.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use storybook_core::fetch::{FetchError, ImageFetcher};
use storybook_core::image_ref::ImageRef;
use tracing::{debug, warn};

/// Standard alphabet, accepting payloads with or without trailing `=`.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded raster flattened onto a white background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Packed 8-bit RGB samples, row-major.
    pub rgb: Vec<u8>,
}

/// What to draw in a sheet's image region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Illustration {
    Raster(RasterImage),
    /// Gray box captioned "Mock Image".
    MockPlaceholder,
    /// Gray box captioned "Image failed to load".
    FailedPlaceholder,
    /// Nothing is drawn.
    Blank,
}

/// Error raised while decoding image bytes.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unreadable image data: {0}")]
    Image(#[from] image::ImageError),
}

/// Decodes PNG or JPEG bytes, compositing any alpha channel over white.
pub(crate) fn decode_raster(bytes: &[u8]) -> Result<RasterImage, DecodeError> {
    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = (decoded.width(), decoded.height());

    let rgb = if decoded.color().has_alpha() {
        decoded
            .to_rgba8()
            .pixels()
            .flat_map(|p| {
                let [r, g, b, a] = p.0;
                [over_white(r, a), over_white(g, a), over_white(b, a)]
            })
            .collect()
    } else {
        decoded.to_rgb8().into_raw()
    };

    Ok(RasterImage { width, height, rgb })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u16::from(channel), u16::from(alpha));
    let blended = (c * a + 255 * (255 - a) + 127) / 255;
    u8::try_from(blended).unwrap_or(u8::MAX)
}

fn decode_base64_raster(payload: &str) -> Result<RasterImage, DecodeError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = PAYLOAD_ENGINE.decode(compact)?;
    decode_raster(&bytes)
}

/// Resolves one page's reference. Never fails: every error becomes a blank
/// region or a placeholder, and is logged with the page number.
pub(crate) async fn resolve(
    reference: ImageRef<'_>,
    page_number: usize,
    fetcher: &dyn ImageFetcher,
    allow_local_paths: bool,
) -> Illustration {
    match reference {
        ImageRef::Absent => Illustration::Blank,
        ImageRef::EmbeddedVector => Illustration::MockPlaceholder,
        ImageRef::EmbeddedRaster { format, payload } => match decode_base64_raster(payload) {
            Ok(raster) => Illustration::Raster(raster),
            Err(error) => {
                warn!(page = page_number, ?format, %error, "embedded image could not be decoded; leaving region blank");
                Illustration::Blank
            }
        },
        ImageRef::RemoteUrl(url) => match fetcher.fetch_remote(url).await {
            Ok(bytes) => decoded_or_failed(&bytes, page_number, reference),
            Err(FetchError::Status(status)) => {
                warn!(page = page_number, url, status, "image fetch returned non-success status; leaving region blank");
                Illustration::Blank
            }
            Err(error) => {
                warn!(page = page_number, url, %error, "image fetch failed");
                Illustration::FailedPlaceholder
            }
        },
        ImageRef::OpaqueRef(path) => {
            let read = if allow_local_paths {
                fetcher.read_local(path).await
            } else {
                Err(FetchError::LocalPathsDisabled)
            };
            match read {
                Ok(bytes) => decoded_or_failed(&bytes, page_number, reference),
                Err(error) => {
                    warn!(page = page_number, path, %error, "image reference could not be read");
                    Illustration::FailedPlaceholder
                }
            }
        }
    }
}

fn decoded_or_failed(bytes: &[u8], page_number: usize, reference: ImageRef<'_>) -> Illustration {
    match decode_raster(bytes) {
        Ok(raster) => {
            debug!(page = page_number, kind = reference.kind(), width = raster.width, height = raster.height, "image decoded");
            Illustration::Raster(raster)
        }
        Err(error) => {
            warn!(page = page_number, kind = reference.kind(), %error, "image bytes could not be decoded");
            Illustration::FailedPlaceholder
        }
    }
}
