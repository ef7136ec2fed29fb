// src/services/notify.rs

//! New-build notification rendering and fan-out.
//!
//! Every registered destination whose subscription covers the build's
//! channel receives one delivery attempt. Deliveries are independent: a
//! failing destination is logged and never aborts the remaining ones.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::error::DeliveryError;
use crate::models::{ReleaseBuild, ReleaseChannel};
use crate::utils::fmt::{dual_timezone_footer, format_size};

/// A rendered new-build notification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    /// Aligned listing of the main and vendor bundle hashes.
    pub hash_listing: String,
    pub size: String,
    /// Dual-timezone timestamp line.
    pub footer: String,
}

impl Notification {
    /// Render a notification from an observed build.
    pub fn render(build: &ReleaseBuild) -> Self {
        Self::render_at(build, Utc::now())
    }

    fn render_at(build: &ReleaseBuild, now: DateTime<Utc>) -> Self {
        Self {
            title: format!("{} build `{}`", build.channel.title(), build.build_id),
            hash_listing: format!(
                "main    {}\nvendor  {}",
                build.hashes.main_hash(),
                build.hashes.vendor()
            ),
            size: format_size(build.size_bytes),
            footer: dual_timezone_footer(now),
        }
    }
}

/// A notification delivery target.
#[async_trait]
pub trait Destination: Send + Sync {
    /// Stable identifier used for subscription lookup and logging.
    fn id(&self) -> &str;

    /// Attempt one delivery of the rendered notification.
    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Fans a new-build event out to every subscribed destination.
#[derive(Default)]
pub struct Notifier {
    destinations: Vec<Arc<dyn Destination>>,
    /// Destination id -> lowercase channel names it subscribes to.
    subscriptions: HashMap<String, HashSet<String>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination with the channel names it wants.
    ///
    /// Names are matched against channels case-insensitively.
    pub fn register<I, S>(&mut self, destination: Arc<dyn Destination>, channels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = channels
            .into_iter()
            .map(|name| name.as_ref().to_ascii_lowercase())
            .collect();
        self.subscriptions
            .insert(destination.id().to_string(), names);
        self.destinations.push(destination);
    }

    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    fn subscribed(&self, id: &str, channel: ReleaseChannel) -> bool {
        self.subscriptions
            .get(id)
            .is_some_and(|names| names.contains(channel.name()))
    }

    /// Deliver a rendered notification for the build to every subscribed
    /// destination. Per-destination failures are logged and swallowed;
    /// this call itself never fails.
    pub async fn notify(&self, build: &ReleaseBuild) {
        let notification = Notification::render(build);

        let deliveries = self
            .destinations
            .iter()
            .filter(|dest| self.subscribed(dest.id(), build.channel))
            .map(|dest| {
                let notification = &notification;
                async move {
                    log::info!(
                        "notifying {} of new {} build {}",
                        dest.id(),
                        build.channel,
                        build.build_id
                    );
                    if let Err(e) = dest.deliver(notification).await {
                        log::warn!("delivery to {} failed, ignoring: {e}", dest.id());
                    }
                }
            });

        join_all(deliveries).await;
    }
}
