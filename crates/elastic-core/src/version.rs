//! Server version parsing and product compatibility policy.
//!
//! The discovery response from the root endpoint identifies the connected
//! server. [`validate_product`] applies the compatibility rules in order:
//! a minimum major version, then a tagline/build-flavor check for servers
//! that predate the product header, then the product header itself.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

use crate::types::InfoResponse;

/// Response header identifying the product on 7.14+ servers.
pub const PRODUCT_HEADER: &str = "X-Elastic-Product";

/// Required value of [`PRODUCT_HEADER`].
pub const PRODUCT_IDENTIFIER: &str = "Elasticsearch";

/// Tagline reported by servers that predate the product header.
pub const TAGLINE: &str = "You Know, for Search";

/// Errors that can occur while reading a reported version number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Missing version.number in info response")]
    Missing,

    #[error("Wrong version.number format in info response")]
    WrongFormat,
}

/// The `major.minor` prefix of a reported server version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElasticVersion {
    pub major: u32,
    pub minor: u32,
}

impl ElasticVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the leading `major.minor` out of a dotted version string.
    /// Trailing components ("8.9.0", "7.14.0-SNAPSHOT") are ignored.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let mut parts = s.split('.');
        let major = parts.next().unwrap_or_default();
        let Some(minor) = parts.next() else {
            return Err(VersionError::WrongFormat);
        };
        let major = major.parse().map_err(|_| VersionError::WrongFormat)?;
        let minor = minor
            .split('-')
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|_| VersionError::WrongFormat)?;
        Ok(Self { major, minor })
    }
}

impl Display for ElasticVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ElasticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Outcome of the product compatibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    Incompatible(String),
}

impl Compatibility {
    pub fn is_compatible(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Compatibility::Compatible => None,
            Compatibility::Incompatible(reason) => Some(reason),
        }
    }
}

fn incompatible(reason: impl Into<String>) -> Compatibility {
    Compatibility::Incompatible(reason.into())
}

/// Decide whether the server described by `info`, and the product header of
/// the discovery response, is a genuine, version-compatible instance.
///
/// Rules apply in order; the first failure wins:
/// - major < 6 is too old;
/// - major 6, and major 7 before 7.14, must report the legacy tagline, and
///   7.x must report the `default` build flavor (absent or `unknown` flavors
///   are tolerated: mocked servers do not report one);
/// - 7.14 and later must send the product header with the expected value.
pub fn validate_product(info: &InfoResponse, product_header: Option<&str>) -> Compatibility {
    let number = match info.version.number.as_deref() {
        Some(number) if !number.is_empty() => number,
        _ => return incompatible(VersionError::Missing.to_string()),
    };

    let version = match ElasticVersion::parse(number) {
        Ok(version) => version,
        Err(error) => return incompatible(error.to_string()),
    };

    if version.major < 6 {
        return incompatible("Elasticsearch version 6 or more is required");
    }

    if version.major == 6 || (version.major == 7 && version.minor < 14) {
        let tagline_matches = info
            .tagline
            .as_deref()
            .is_some_and(|tagline| tagline.eq_ignore_ascii_case(TAGLINE));
        if !tagline_matches {
            return incompatible(format!(
                "Invalid or missing tagline [{}]",
                info.tagline.as_deref().unwrap_or_default()
            ));
        }

        if version.major == 7 {
            match info.version.build_flavor.as_deref() {
                Some("default") | Some("unknown") | None => {}
                Some(flavor) => {
                    return incompatible(format!("Invalid or missing build flavor [{flavor}]"));
                }
            }
        }

        return Compatibility::Compatible;
    }

    match product_header {
        None => incompatible(
            "Missing [X-Elastic-Product] header. Please check that you are connecting to an \
             Elasticsearch instance, and that any networking filters are preserving that header.",
        ),
        Some(value) if value != PRODUCT_IDENTIFIER => {
            incompatible(format!("Invalid value [{value}] for [X-Elastic-Product] header."))
        }
        Some(_) => Compatibility::Compatible,
    }
}
