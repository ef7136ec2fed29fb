// src/models/mod.rs

//! Domain models for the release poller.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod build;
mod channel;
mod config;

// Re-export all public types
pub use build::{AssetHashes, ReleaseBuild};
pub use channel::ReleaseChannel;
pub use config::{Config, FeedConfig, HttpConfig, PollerConfig, StorageConfig};
