// src/lib.rs

//! ReleaseRacer Library
//!
//! Polls Discord release channels for new client builds, tracks the last
//! seen build per channel, and fans out notifications when one ships.

pub mod error;
pub mod models;
pub mod poller;
pub mod services;
pub mod storage;
pub mod utils;
