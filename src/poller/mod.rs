// src/poller/mod.rs

//! Per-channel polling loops and their supervisor.
//!
//! One independent task per monitored channel runs fetch -> track ->
//! (maybe) notify in strict order, sleeping between cycles. The
//! supervisor owns the task handles and supports stop, reboot and
//! health inspection.

mod supervisor;
mod task;

pub use supervisor::PollerSet;
pub use task::{ChannelPoller, PollerStatus, TaskState};
