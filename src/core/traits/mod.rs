//! Core traits for platform-agnostic scheduling.
//!
//! This module provides trait abstractions that decouple the scheduler
//! from platform-specific implementations (Embassy, mock, etc.).
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                 Scheduler<C: TimeSource, N>                │
//! │                           │                                │
//! │          ┌────────────────┴────────────────┐               │
//! │          ▼                                 ▼               │
//! │  ┌──────────────────────┐    ┌──────────────────────────┐ │
//! │  │ Embassy Impl         │    │ Mock Impl                │ │
//! │  │ #[cfg(feature =      │    │ (always available)       │ │
//! │  │   "embassy")]        │    │                          │ │
//! │  │ EmbassyTime,         │    │ MockTime,                │ │
//! │  │ CriticalSnapshot<T>  │    │ LocalSnapshot<T>         │ │
//! │  └──────────────────────┘    └──────────────────────────┘ │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Features
//!
//! - **`embassy`**: Enables Embassy implementations (`EmbassyTime`, `CriticalSnapshot<T>`)
//! - `MockTime` and `LocalSnapshot<T>` are always available for host testing

pub mod snapshot;
pub mod time;

pub use snapshot::{LocalSnapshot, SnapshotCell, Stamped};
pub use time::{MockTime, TimeSource, MS_CLOCK_ROLLOVER, US_CLOCK_ROLLOVER};

#[cfg(feature = "embassy")]
pub use snapshot::CriticalSnapshot;

#[cfg(feature = "embassy")]
pub use time::EmbassyTime;
