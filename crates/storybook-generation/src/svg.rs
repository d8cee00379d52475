//! Inline SVG art encoded as `data:image/svg+xml;utf8,` URIs.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const DATA_URI_PREFIX: &str = "data:image/svg+xml;utf8,";

/// Bytes escaped in a URI component: everything but ASCII alphanumerics and
/// `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Wraps `svg` in a data URI, percent-encoding it as a URI component.
pub(crate) fn data_uri(svg: &str) -> String {
    format!("{DATA_URI_PREFIX}{}", utf8_percent_encode(svg, COMPONENT))
}

/// A 400×300 card filled with `fill`, captioned with `caption` in `ink`.
/// `overlay` adds the translucent circle used on mock art.
pub(crate) fn captioned_card(fill: &str, caption: &str, ink: &str, overlay: bool) -> String {
    let circle = if overlay {
        r#"<circle cx="200" cy="150" r="50" fill="white" opacity="0.3"/>"#
    } else {
        ""
    };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300"><rect width="100%" height="100%" fill="{fill}"/>{circle}<text x="200" y="155" text-anchor="middle" font-family="Arial" font-size="16" fill="{ink}">{caption}</text></svg>"#
    )
}
