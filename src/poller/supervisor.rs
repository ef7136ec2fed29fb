// src/poller/supervisor.rs

//! Poller lifecycle supervision.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::models::ReleaseChannel;
use crate::poller::task::{ChannelPoller, PollerStatus, TaskState};

struct PollerTask {
    state: Arc<TaskState>,
    handle: JoinHandle<()>,
}

/// Owns one poll task per monitored channel.
///
/// Tasks are keyed by channel; reboot cancels every task and spawns fresh
/// replacements with clean state.
pub struct PollerSet {
    poller: Arc<ChannelPoller>,
    channels: Vec<ReleaseChannel>,
    tasks: HashMap<ReleaseChannel, PollerTask>,
}

impl PollerSet {
    pub fn new(poller: Arc<ChannelPoller>, channels: Vec<ReleaseChannel>) -> Self {
        Self {
            poller,
            channels,
            tasks: HashMap::new(),
        }
    }

    /// Spawn one poll task per configured channel.
    pub fn boot(&mut self) {
        log::info!("booting pollers");

        for &channel in &self.channels {
            log::info!("{channel}: boot");

            let state = Arc::new(TaskState::new(channel));
            let poller = Arc::clone(&self.poller);
            let task_state = Arc::clone(&state);
            let handle = tokio::spawn(async move { poller.run(channel, task_state).await });

            self.tasks.insert(channel, PollerTask { state, handle });
        }
    }

    /// Cancel every running poll task.
    pub fn stop_all(&mut self) {
        for (channel, task) in &self.tasks {
            if !task.handle.is_finished() {
                log::info!("{channel}: stopping");
                task.handle.abort();
            }
            task.state.stop();
        }
    }

    /// Cancel all tasks and spawn fresh replacements with clean state.
    pub fn reboot(&mut self) {
        self.stop_all();
        self.tasks.clear();
        self.boot();
    }

    /// Current status of a channel's task.
    pub fn status(&self, channel: ReleaseChannel) -> Option<PollerStatus> {
        self.tasks.get(&channel).map(|task| task.state.status())
    }

    /// Last recorded error for a channel's task.
    pub fn last_error(&self, channel: ReleaseChannel) -> Option<String> {
        self.tasks
            .get(&channel)
            .and_then(|task| task.state.last_error())
    }

    /// Status of every channel's task, in configured channel order.
    pub fn statuses(&self) -> Vec<(ReleaseChannel, PollerStatus)> {
        self.channels
            .iter()
            .filter_map(|&channel| self.status(channel).map(|status| (channel, status)))
            .collect()
    }

    /// Wait for every task to finish. Used after `stop_all` for a clean
    /// shutdown; aborted tasks resolve promptly.
    pub async fn join_all(&mut self) {
        for (_, task) in self.tasks.drain() {
            let _ = task.handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::ReleaseBuild;
    use crate::services::{BuildSource, Notifier};
    use crate::storage::{JsonStore, ReleaseTracker};

    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Never resolves; keeps poll tasks pinned in their fetch.
    struct PendingSource;

    #[async_trait]
    impl BuildSource for PendingSource {
        async fn fetch(&self, _channel: ReleaseChannel) -> Result<ReleaseBuild, FetchError> {
            futures::future::pending().await
        }
    }

    async fn poller_set(tmp: &TempDir) -> PollerSet {
        let store = JsonStore::open(tmp.path().join("releases.json"))
            .await
            .unwrap();
        let poller = Arc::new(ChannelPoller::new(
            Arc::new(PendingSource),
            Arc::new(ReleaseTracker::new(store)),
            Arc::new(Notifier::new()),
            Duration::from_millis(5),
        ));
        PollerSet::new(poller, ReleaseChannel::ALL.to_vec())
    }

    #[tokio::test]
    async fn boot_spawns_a_running_task_per_channel() {
        let tmp = TempDir::new().unwrap();
        let mut set = poller_set(&tmp).await;

        set.boot();

        let statuses = set.statuses();
        assert_eq!(statuses.len(), 3);
        assert!(
            statuses
                .iter()
                .all(|(_, status)| *status == PollerStatus::Running)
        );

        set.stop_all();
        set.join_all().await;
    }

    #[tokio::test]
    async fn stop_all_marks_tasks_stopped() {
        let tmp = TempDir::new().unwrap();
        let mut set = poller_set(&tmp).await;

        set.boot();
        set.stop_all();

        assert_eq!(
            set.status(ReleaseChannel::Stable),
            Some(PollerStatus::Stopped)
        );
        set.join_all().await;
    }

    #[tokio::test]
    async fn reboot_replaces_tasks_with_clean_state() {
        let tmp = TempDir::new().unwrap();
        let mut set = poller_set(&tmp).await;

        set.boot();
        set.stop_all();
        set.reboot();

        assert_eq!(
            set.status(ReleaseChannel::Canary),
            Some(PollerStatus::Running)
        );
        assert_eq!(set.last_error(ReleaseChannel::Canary), None);

        set.stop_all();
        set.join_all().await;
    }

    #[tokio::test]
    async fn unbooted_set_reports_no_statuses() {
        let tmp = TempDir::new().unwrap();
        let set = poller_set(&tmp).await;
        assert!(set.statuses().is_empty());
        assert_eq!(set.status(ReleaseChannel::Stable), None);
    }
}
