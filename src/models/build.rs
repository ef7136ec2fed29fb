// src/models/build.rs

//! Observed build snapshots.

use super::ReleaseChannel;

/// Asset hashes extracted from a channel's entry page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHashes {
    hashes: Vec<String>,
}

impl AssetHashes {
    /// Construct from regex matches in document order.
    ///
    /// Callers guarantee at least one hash; the extractor rejects empty
    /// match sets before this is reached.
    pub fn new(hashes: Vec<String>) -> Self {
        debug_assert!(!hashes.is_empty());
        Self { hashes }
    }

    /// The first extracted hash, conventionally the vendor bundle.
    pub fn vendor(&self) -> &str {
        self.hashes.first().map(String::as_str).unwrap_or_default()
    }

    /// The last extracted hash, designated the "main" bundle.
    pub fn main_hash(&self) -> &str {
        self.hashes.last().map(String::as_str).unwrap_or_default()
    }

    /// All hashes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hashes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

/// One observed snapshot of a channel's deployed build.
///
/// Constructed by the build fetcher on each successful fetch cycle and
/// consumed by the tracker (dedupe) and the notifier (rendering).
#[derive(Debug, Clone)]
pub struct ReleaseBuild {
    pub channel: ReleaseChannel,
    pub hashes: AssetHashes,
    /// Numeric release id, kept as the exact captured string.
    pub build_id: String,
    /// Byte length of the fetched main asset.
    pub size_bytes: u64,
}
