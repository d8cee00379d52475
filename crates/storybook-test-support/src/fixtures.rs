//! Story and image fixtures.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use storybook_core::story::{Page, Story};

/// A valid story titled "Ana's Kindness Adventure" with `pages` pages and no
/// illustrations. Page `i` (1-based) reads "Page {i} text.".
#[must_use]
pub fn sample_story(pages: usize) -> Story {
    Story::new(
        "Ana's Kindness Adventure",
        (1..=pages)
            .map(|i| {
                Page::new(
                    format!("Page {i} text."),
                    format!("A gentle watercolor scene, moment {i}"),
                )
            })
            .collect(),
    )
}

/// A solid-color opaque PNG.
///
/// # Panics
///
/// Panics if the encoder fails, which does not happen for in-memory output.
#[must_use]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        &DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 120, 80]))),
        ImageFormat::Png,
    )
}

/// A solid-color PNG with an alpha channel.
///
/// # Panics
///
/// Panics if the encoder fails.
#[must_use]
pub fn rgba_png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    encode(
        &DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(pixel))),
        ImageFormat::Png,
    )
}

/// A solid-color baseline JPEG.
///
/// # Panics
///
/// Panics if the encoder fails.
#[must_use]
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(
        &DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 90, 160]))),
        ImageFormat::Jpeg,
    )
}

/// `data:image/png;base64,…` wrapping [`png_bytes`].
#[must_use]
pub fn png_data_uri(width: u32, height: u32) -> String {
    format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png_bytes(width, height))
    )
}

/// A small inline SVG data URI, the shape produced for mock art.
#[must_use]
pub fn svg_data_uri() -> String {
    "data:image/svg+xml;utf8,%3Csvg xmlns='http://www.w3.org/2000/svg' width='64' height='64'%3E%3Crect width='64' height='64' fill='%23fde68a'/%3E%3C/svg%3E".to_owned()
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}
