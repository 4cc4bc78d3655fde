//! Core scheduling functionality
//!
//! This module contains the scheduling engine and the platform-agnostic
//! traits it runs on.

pub mod logging;
pub mod scheduler;
pub mod traits;
