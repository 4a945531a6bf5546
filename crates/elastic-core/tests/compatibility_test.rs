//! Product compatibility policy table.

use elastic_core::{validate_product, Compatibility, InfoResponse};
use pretty_assertions::assert_eq;

fn info(number: Option<&str>, flavor: Option<&str>, tagline: Option<&str>) -> InfoResponse {
    let raw = serde_json::json!({
        "name": "node-1",
        "version": {
            "number": number,
            "build_flavor": flavor,
        },
        "tagline": tagline,
    });
    serde_json::from_value(raw).unwrap()
}

fn reason(outcome: &Compatibility) -> &str {
    outcome.reason().expect("expected an incompatible outcome")
}

#[test]
fn versions_before_6_are_rejected() {
    let outcome = validate_product(&info(Some("5.6.0"), None, None), None);
    assert_eq!(
        reason(&outcome),
        "Elasticsearch version 6 or more is required"
    );
}

#[test]
fn version_6_requires_the_tagline() {
    let with_tagline = info(Some("6.8.0"), None, Some("You Know, for Search"));
    assert!(validate_product(&with_tagline, None).is_compatible());

    let without = validate_product(&info(Some("6.8.0"), None, None), None);
    assert_eq!(reason(&without), "Invalid or missing tagline []");

    let wrong = validate_product(&info(Some("6.8.0"), None, Some("wrong")), None);
    assert_eq!(reason(&wrong), "Invalid or missing tagline [wrong]");
}

#[test]
fn tagline_comparison_ignores_case() {
    let outcome = validate_product(
        &info(Some("6.8.0"), None, Some("you know, for search")),
        None,
    );
    assert!(outcome.is_compatible());
}

#[test]
fn early_7_requires_tagline_and_default_flavor() {
    let default_flavor = info(
        Some("7.0.0"),
        Some("default"),
        Some("You Know, for Search"),
    );
    assert!(validate_product(&default_flavor, None).is_compatible());

    let oss = validate_product(
        &info(Some("7.13.0"), Some("oss"), Some("You Know, for Search")),
        None,
    );
    assert_eq!(reason(&oss), "Invalid or missing build flavor [oss]");
}

#[test]
fn early_7_tolerates_unreported_flavor() {
    let absent = info(Some("7.0.0"), None, Some("You Know, for Search"));
    assert!(validate_product(&absent, None).is_compatible());

    let unknown = info(Some("7.13.0"), Some("unknown"), Some("You Know, for Search"));
    assert!(validate_product(&unknown, None).is_compatible());
}

#[test]
fn from_7_14_the_product_header_decides() {
    let server = info(Some("7.14.0"), Some("default"), None);
    assert!(validate_product(&server, Some("Elasticsearch")).is_compatible());

    let missing = validate_product(&server, None);
    assert!(reason(&missing).starts_with("Missing [X-Elastic-Product] header."));

    let wrong = validate_product(&server, Some("Wrong"));
    assert_eq!(
        reason(&wrong),
        "Invalid value [Wrong] for [X-Elastic-Product] header."
    );
}

#[test]
fn version_8_uses_the_product_header() {
    let server = info(Some("8.9.0"), None, None);
    assert!(validate_product(&server, Some("Elasticsearch")).is_compatible());
    assert!(!validate_product(&server, None).is_compatible());
}

#[test]
fn missing_or_malformed_version_numbers_are_rejected() {
    let missing = validate_product(&info(None, None, None), None);
    assert_eq!(reason(&missing), "Missing version.number in info response");

    let empty = validate_product(&info(Some(""), None, None), None);
    assert_eq!(reason(&empty), "Missing version.number in info response");

    let malformed = validate_product(&info(Some("8"), None, None), None);
    assert_eq!(
        reason(&malformed),
        "Wrong version.number format in info response"
    );
}
