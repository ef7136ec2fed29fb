// src/services/extract.rs

//! Fingerprint extraction from served markup and scripts.
//!
//! Pure pattern matching over fetched bodies: no I/O, deterministic, and
//! bounded-time (anchored literal-heavy patterns, safe on arbitrarily large
//! or malformed input).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::models::AssetHashes;

/// Matches script tags referencing hashed JS bundles on the entry page.
static SCRIPT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<script src="/assets/([a-f0-9]+)\.js" [^>]+></script>"#)
        .expect("script tag pattern is valid")
});

/// Matches the release marker embedded in the main JS bundle.
static BUILD_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{environment:"[a-z]+",release:"(\d+)",ign"#)
        .expect("build marker pattern is valid")
});

/// Extract asset hashes from entry page HTML, in document order.
pub fn extract_asset_hashes(html: &str) -> Result<AssetHashes, ExtractError> {
    let hashes: Vec<String> = SCRIPT_TAG_RE
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect();

    if hashes.is_empty() {
        return Err(ExtractError::NoScriptTags);
    }

    Ok(AssetHashes::new(hashes))
}

/// Extract the numeric release build id from main bundle JS source.
///
/// Returns the captured digits verbatim; leading zeros are preserved.
pub fn extract_build_id(js_source: &str) -> Result<String, ExtractError> {
    BUILD_MARKER_RE
        .captures(js_source)
        .map(|caps| caps[1].to_string())
        .ok_or(ExtractError::NoBuildMarker)
}
