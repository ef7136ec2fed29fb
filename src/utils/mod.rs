// src/utils/mod.rs

//! Utility functions and helpers.

pub mod fmt;
pub mod http;
