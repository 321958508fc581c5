//! hostwatch — point-in-time host resource usage snapshots for Linux.
//!
//! Provides:
//! - `collector` — snapshot acquisition from `/proc` and command output
//! - `model` — the normalized snapshot tables
//! - `metrics` — pure derivations (percentages, sums, unit conversions)
//! - `engine` — snapshot lifecycle (refresh/atomic swap) and query surface
//! - `config` — engine configuration
//!
//! The engine produces exactly one snapshot per refresh and exposes derived
//! values computed from it; scheduling, alerting and persistence belong to
//! the caller.

pub mod collector;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod model;

pub use collector::{CollectError, CommandError, MockSource, RealSource, TextSource};
pub use config::EngineConfig;
pub use engine::UsageEngine;
pub use metrics::MetricError;
pub use model::{ProcessSample, Snapshot};
