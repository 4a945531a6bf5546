//! Compatibility-mode header rewriting.
//!
//! When compatibility mode is enabled the client asks the server for the
//! previous major's wire format by rewriting `Content-Type` and `Accept`
//! media types to their versioned-compatible forms (the table in
//! [`MediaKind`]). The transform is pure and idempotent: values are replaced
//! in place, a header is never appended next to an existing one, and an
//! already-compatible value is left untouched.

use elastic_core::{MediaKind, RequestDescriptor};

const CONTENT_TYPE: &str = "Content-Type";
const ACCEPT: &str = "Accept";

/// Rewrite the descriptor's outgoing headers to versioned-compatible media
/// types.
///
/// - `Content-Type`: existing values are rewritten; when the header is
///   absent and the request carries a body, it is derived from the body's
///   declared media type.
/// - `Accept`: existing values are rewritten; when entirely absent it
///   defaults to the compatible form of the default response encoding.
pub fn rewrite_for_compatibility(descriptor: &mut RequestDescriptor) {
    rewrite_header(descriptor, CONTENT_TYPE);
    if !descriptor.has_header(CONTENT_TYPE) {
        if let Some(body) = &descriptor.body {
            if let Some(compatible) = compatible_value(&body.media_type) {
                descriptor
                    .headers
                    .push((CONTENT_TYPE.to_string(), compatible));
            }
        }
    }

    rewrite_header(descriptor, ACCEPT);
    if !descriptor.has_header(ACCEPT) {
        descriptor.headers.push((
            ACCEPT.to_string(),
            MediaKind::Json.compatible_media_type().to_string(),
        ));
    }
}

/// Rewrite every header with this name whose value matches the media table.
fn rewrite_header(descriptor: &mut RequestDescriptor, name: &str) {
    for (header, value) in descriptor.headers.iter_mut() {
        if !header.eq_ignore_ascii_case(name) {
            continue;
        }
        if let Some(compatible) = compatible_value(value) {
            *value = compatible;
        }
    }
}

/// Compatible form of a media type value, preserving any trailing
/// parameters. `None` when the value matches no plain media type — notably
/// when it is already in compatible form.
fn compatible_value(value: &str) -> Option<String> {
    MediaKind::ALL.into_iter().find_map(|kind| {
        value
            .starts_with(kind.media_type())
            .then(|| value.replacen(kind.media_type(), kind.compatible_media_type(), 1))
    })
}
