// src/storage/tracker.rs

//! Last-seen build tracking and dedupe.

use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{ReleaseBuild, ReleaseChannel};
use crate::storage::JsonStore;

/// Outcome of a `track` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The build differs from the last persisted one; it was persisted and
    /// is eligible for fan-out.
    New,
    /// The build matches the last persisted one; nothing was written.
    Stale,
}

/// Tracks the last seen build id per channel, write-through.
///
/// Dedupe is exact string equality on the build id. A decreasing id (a
/// rollback) still counts as new. Keys are per-channel, so concurrent
/// pollers never contend on the same entry; the mutex only serializes
/// the whole-file writes.
pub struct ReleaseTracker {
    store: Mutex<JsonStore>,
}

impl ReleaseTracker {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    fn key(channel: ReleaseChannel) -> String {
        format!("last_release_{}", channel.name())
    }

    /// Decide whether an observed build is new for its channel.
    ///
    /// On `New`, the id is persisted durably before this returns.
    pub async fn track(&self, build: &ReleaseBuild) -> Result<Decision> {
        let mut store = self.store.lock().await;
        let key = Self::key(build.channel);

        match store.get(&key) {
            Some(last) if last == build.build_id => {
                log::info!("{}: stale build {}", build.channel, build.build_id);
                Ok(Decision::Stale)
            }
            _ => {
                log::info!("{}: detected new build {}", build.channel, build.build_id);
                store.put(key, build.build_id.clone()).await?;
                Ok(Decision::New)
            }
        }
    }

    /// Last persisted build id for a channel, if any.
    pub async fn last_build_id(&self, channel: ReleaseChannel) -> Option<String> {
        self.store
            .lock()
            .await
            .get(&Self::key(channel))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetHashes;

    use tempfile::TempDir;

    fn build(channel: ReleaseChannel, build_id: &str) -> ReleaseBuild {
        ReleaseBuild {
            channel,
            hashes: AssetHashes::new(vec!["abc123".to_string(), "def456".to_string()]),
            build_id: build_id.to_string(),
            size_bytes: 42,
        }
    }

    async fn tracker_in(tmp: &TempDir) -> ReleaseTracker {
        let store = JsonStore::open(tmp.path().join("releases.json"))
            .await
            .unwrap();
        ReleaseTracker::new(store)
    }

    #[tokio::test]
    async fn first_observation_is_new_second_is_stale() {
        let tmp = TempDir::new().unwrap();
        let tracker = tracker_in(&tmp).await;
        let observed = build(ReleaseChannel::Stable, "987654321");

        assert_eq!(tracker.track(&observed).await.unwrap(), Decision::New);
        assert_eq!(tracker.track(&observed).await.unwrap(), Decision::Stale);
        assert_eq!(
            tracker.last_build_id(ReleaseChannel::Stable).await,
            Some("987654321".to_string())
        );
    }

    #[tokio::test]
    async fn persisted_state_survives_reopen() {
        let tmp = TempDir::new().unwrap();

        {
            let tracker = tracker_in(&tmp).await;
            tracker
                .track(&build(ReleaseChannel::Stable, "987654321"))
                .await
                .unwrap();
        }

        let tracker = tracker_in(&tmp).await;
        assert_eq!(
            tracker
                .track(&build(ReleaseChannel::Stable, "987654321"))
                .await
                .unwrap(),
            Decision::Stale
        );
    }

    #[tokio::test]
    async fn channels_are_tracked_independently() {
        let tmp = TempDir::new().unwrap();
        let tracker = tracker_in(&tmp).await;

        assert_eq!(
            tracker
                .track(&build(ReleaseChannel::Stable, "111"))
                .await
                .unwrap(),
            Decision::New
        );
        assert_eq!(
            tracker
                .track(&build(ReleaseChannel::Canary, "111"))
                .await
                .unwrap(),
            Decision::New
        );

        assert_eq!(
            tracker.last_build_id(ReleaseChannel::Stable).await,
            Some("111".to_string())
        );
        assert_eq!(
            tracker.last_build_id(ReleaseChannel::Canary).await,
            Some("111".to_string())
        );
        assert_eq!(tracker.last_build_id(ReleaseChannel::Ptb).await, None);
    }

    #[tokio::test]
    async fn rollback_to_lower_id_is_still_new() {
        let tmp = TempDir::new().unwrap();
        let tracker = tracker_in(&tmp).await;

        tracker
            .track(&build(ReleaseChannel::Canary, "200"))
            .await
            .unwrap();
        assert_eq!(
            tracker
                .track(&build(ReleaseChannel::Canary, "100"))
                .await
                .unwrap(),
            Decision::New
        );
        assert_eq!(
            tracker.last_build_id(ReleaseChannel::Canary).await,
            Some("100".to_string())
        );
    }

    #[tokio::test]
    async fn persisted_key_uses_lowercase_channel_name() {
        let tmp = TempDir::new().unwrap();
        let tracker = tracker_in(&tmp).await;
        tracker
            .track(&build(ReleaseChannel::Stable, "987654321"))
            .await
            .unwrap();
        drop(tracker);

        let raw = tokio::fs::read(tmp.path().join("releases.json"))
            .await
            .unwrap();
        let parsed: std::collections::HashMap<String, String> =
            serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            parsed.get("last_release_stable"),
            Some(&"987654321".to_string())
        );
    }
}
