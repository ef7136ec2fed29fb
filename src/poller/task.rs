// src/poller/task.rs

//! Per-channel polling loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::ReleaseChannel;
use crate::services::{BuildSource, Notifier};
use crate::storage::{Decision, ReleaseTracker};

/// Lifecycle state of a channel's poll task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollerStatus {
    Running,
    /// Manually cancelled by the supervisor.
    Stopped,
    /// Terminated on an unrecoverable fetch/extract/storage error.
    Failed(String),
}

impl std::fmt::Display for PollerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Stopped => f.write_str("stopped"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// Shared, inspectable state for one channel's poll task.
#[derive(Debug)]
pub struct TaskState {
    channel: ReleaseChannel,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    status: PollerStatus,
    last_error: Option<String>,
}

impl TaskState {
    pub fn new(channel: ReleaseChannel) -> Self {
        Self {
            channel,
            inner: Mutex::new(Inner {
                status: PollerStatus::Running,
                last_error: None,
            }),
        }
    }

    pub fn channel(&self) -> ReleaseChannel {
        self.channel
    }

    pub fn status(&self) -> PollerStatus {
        self.lock().status.clone()
    }

    /// Most recent error observed by the loop, including recovered timeouts.
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("task state lock poisoned")
    }

    fn record_error(&self, error: &str) {
        self.lock().last_error = Some(error.to_string());
    }

    fn fail(&self, error: String) {
        let mut inner = self.lock();
        inner.last_error = Some(error.clone());
        inner.status = PollerStatus::Failed(error);
    }

    /// Mark the task stopped, unless it already terminated on its own.
    pub(super) fn stop(&self) {
        let mut inner = self.lock();
        if inner.status == PollerStatus::Running {
            inner.status = PollerStatus::Stopped;
        }
    }
}

enum CycleFailure {
    /// Recovered locally: retry immediately, no sleep.
    Timeout(String),
    /// Terminates the loop.
    Fatal(AppError),
}

/// Drives the poll loop for monitored channels.
///
/// Holds the shared collaborators; the supervisor runs one `run` call
/// per channel on its own task.
pub struct ChannelPoller {
    source: Arc<dyn BuildSource>,
    tracker: Arc<ReleaseTracker>,
    notifier: Arc<Notifier>,
    poll_interval: Duration,
}

impl ChannelPoller {
    pub fn new(
        source: Arc<dyn BuildSource>,
        tracker: Arc<ReleaseTracker>,
        notifier: Arc<Notifier>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            source,
            tracker,
            notifier,
            poll_interval,
        }
    }

    /// Poll one channel until cancelled or a fatal error terminates it.
    pub async fn run(&self, channel: ReleaseChannel, state: Arc<TaskState>) {
        log::info!("{channel}: poll task started");

        loop {
            match self.poll_once(channel).await {
                Ok(()) => tokio::time::sleep(self.poll_interval).await,
                Err(CycleFailure::Timeout(e)) => {
                    log::warn!("{channel}: timed out, retrying - {e}");
                    state.record_error(&e);
                }
                Err(CycleFailure::Fatal(e)) => {
                    log::error!("{channel}: poll task terminated: {e}");
                    state.fail(e.to_string());
                    return;
                }
            }
        }
    }

    /// One fetch -> track -> (maybe) notify cycle.
    async fn poll_once(&self, channel: ReleaseChannel) -> Result<(), CycleFailure> {
        log::info!("{channel}: fetching build information");

        let build = self.source.fetch(channel).await.map_err(|e| {
            if e.is_timeout() {
                CycleFailure::Timeout(e.to_string())
            } else {
                CycleFailure::Fatal(e.into())
            }
        })?;

        let decision = self
            .tracker
            .track(&build)
            .await
            .map_err(CycleFailure::Fatal)?;

        if decision == Decision::New {
            self.notifier.notify(&build).await;
        }

        Ok(())
    }
}
