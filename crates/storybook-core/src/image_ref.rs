//! Classification of a page's illustration reference.
//!
//! A reference is inspected once and turned into an [`ImageRef`]; renderers
//! dispatch on the variant instead of re-testing string prefixes.

const PNG_PREFIX: &str = "data:image/png;base64,";
const JPEG_PREFIX: &str = "data:image/jpeg;base64,";
const SVG_PREFIX: &str = "data:image/svg+xml;";

/// Encoding of an embedded raster payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    /// `image/png`
    Png,
    /// `image/jpeg`
    Jpeg,
}

/// What a page's `imageUrl` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// A base64 PNG or JPEG data URI; `payload` is the text after the comma.
    EmbeddedRaster {
        /// Declared raster encoding.
        format: RasterFormat,
        /// Base64 payload.
        payload: &'a str,
    },
    /// An SVG data URI, used for mock and placeholder art.
    EmbeddedVector,
    /// An `http` or `https` URL.
    RemoteUrl(&'a str),
    /// Any other non-empty value, such as a local file path.
    OpaqueRef(&'a str),
    /// No reference, or an empty one.
    Absent,
}

impl<'a> ImageRef<'a> {
    /// Classifies an optional reference. Prefix order matters: data URIs are
    /// tested before the `http` check.
    #[must_use]
    pub fn classify(reference: Option<&'a str>) -> Self {
        let Some(reference) = reference.filter(|r| !r.is_empty()) else {
            return Self::Absent;
        };

        if let Some(payload) = reference.strip_prefix(PNG_PREFIX) {
            Self::EmbeddedRaster {
                format: RasterFormat::Png,
                payload,
            }
        } else if let Some(payload) = reference.strip_prefix(JPEG_PREFIX) {
            Self::EmbeddedRaster {
                format: RasterFormat::Jpeg,
                payload,
            }
        } else if reference.starts_with(SVG_PREFIX) {
            Self::EmbeddedVector
        } else if reference.starts_with("http") {
            Self::RemoteUrl(reference)
        } else {
            Self::OpaqueRef(reference)
        }
    }

    /// Short label for log lines.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmbeddedRaster { .. } => "embedded_raster",
            Self::EmbeddedVector => "embedded_vector",
            Self::RemoteUrl(_) => "remote_url",
            Self::OpaqueRef(_) => "opaque_ref",
            Self::Absent => "absent",
        }
    }
}
