// src/services/mod.rs

//! Service layer for the release poller.
//!
//! This module contains the business logic for:
//! - Fingerprint extraction (`extract`)
//! - Build information fetching (`BuildFetcher`)
//! - Notification rendering and fan-out (`Notifier`)
//! - Webhook delivery (`WebhookDestination`)

pub mod extract;
mod fetch;
mod notify;
mod webhook;

pub use fetch::{BuildFetcher, BuildSource};
pub use notify::{Destination, Notification, Notifier};
pub use webhook::WebhookDestination;
