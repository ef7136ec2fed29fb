// src/storage/mod.rs

//! Persistent state for build tracking.
//!
//! A single JSON object on local disk maps `last_release_{channel}` keys to
//! build id strings. The file is loaded fully at startup and rewritten
//! fully on every mutation; there is no partial update.

mod json;
mod tracker;

pub use json::JsonStore;
pub use tracker::{Decision, ReleaseTracker};
