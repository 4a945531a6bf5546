//! Media types supported by the service.
//!
//! Each wire encoding has a plain media type and a versioned-compatible form.
//! The compatible form is sent in `Content-Type`/`Accept` when compatibility
//! mode is enabled, asking the server for the previous major's wire format.

/// A wire encoding the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Json,
    NdJson,
    Star,
    Yaml,
    Smile,
    Cbor,
}

impl MediaKind {
    pub const ALL: [MediaKind; 6] = [
        MediaKind::Json,
        MediaKind::NdJson,
        MediaKind::Star,
        MediaKind::Yaml,
        MediaKind::Smile,
        MediaKind::Cbor,
    ];

    /// Plain media type.
    pub fn media_type(&self) -> &'static str {
        match self {
            MediaKind::Json => "application/json",
            MediaKind::NdJson => "application/x-ndjson",
            MediaKind::Star => "application/*",
            MediaKind::Yaml => "application/yaml",
            MediaKind::Smile => "application/smile",
            MediaKind::Cbor => "application/cbor",
        }
    }

    /// Versioned-compatible media type. `Star` maps to the compatible JSON
    /// form, the default output encoding.
    pub fn compatible_media_type(&self) -> &'static str {
        match self {
            MediaKind::Json | MediaKind::Star => {
                "application/vnd.elasticsearch+json; compatible-with=7"
            }
            MediaKind::NdJson => "application/vnd.elasticsearch+x-ndjson; compatible-with=7",
            MediaKind::Yaml => "application/vnd.elasticsearch+yaml; compatible-with=7",
            MediaKind::Smile => "application/vnd.elasticsearch+smile; compatible-with=7",
            MediaKind::Cbor => "application/vnd.elasticsearch+cbor; compatible-with=7",
        }
    }

    /// Match a media type value (with or without parameters) against the
    /// table, accepting both the plain and the versioned-compatible forms.
    pub fn from_media_type(value: &str) -> Option<MediaKind> {
        let token = value.split(';').next().unwrap_or_default().trim();
        Self::ALL.into_iter().find(|kind| {
            token.eq_ignore_ascii_case(kind.media_type())
                || token.eq_ignore_ascii_case(compatible_token(*kind))
        })
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.media_type())
    }
}

/// Compatible media type without its `compatible-with` parameter.
fn compatible_token(kind: MediaKind) -> &'static str {
    kind.compatible_media_type()
        .split(';')
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_forms_resolve() {
        assert_eq!(
            MediaKind::from_media_type("application/json"),
            Some(MediaKind::Json)
        );
        assert_eq!(
            MediaKind::from_media_type("application/x-ndjson"),
            Some(MediaKind::NdJson)
        );
        assert_eq!(MediaKind::from_media_type("text/plain"), None);
    }

    #[test]
    fn parameters_are_ignored() {
        assert_eq!(
            MediaKind::from_media_type("application/json; charset=UTF-8"),
            Some(MediaKind::Json)
        );
    }

    #[test]
    fn compatible_forms_resolve() {
        assert_eq!(
            MediaKind::from_media_type("application/vnd.elasticsearch+json; compatible-with=7"),
            Some(MediaKind::Json)
        );
        assert_eq!(
            MediaKind::from_media_type("application/vnd.elasticsearch+cbor; compatible-with=7"),
            Some(MediaKind::Cbor)
        );
    }

    #[test]
    fn star_maps_to_compatible_json() {
        assert_eq!(
            MediaKind::Star.compatible_media_type(),
            MediaKind::Json.compatible_media_type()
        );
    }
}
