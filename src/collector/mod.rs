//! Snapshot acquisition for Linux hosts.
//!
//! This module converts raw, loosely structured text — kernel pseudo-files
//! and captured command output — into the normalized snapshot tables, with
//! support for mocking so the full path is testable on any platform.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Collector                           │
//! │  ┌─────────────────────┐    ┌──────────────────────────────┐ │
//! │  │   SystemCollector   │    │      CommandCollector        │ │
//! │  │  - /proc/meminfo    │    │  - df / df --total           │ │
//! │  │  - /proc/net/*      │    │  - ps axo comm,pcpu,pmem     │ │
//! │  │  - /proc/diskstats  │    │    (live queries, never      │ │
//! │  │  - /proc/loadavg    │    │     stored in a snapshot)    │ │
//! │  │  - /proc/stat       │    └──────────────┬───────────────┘ │
//! │  └──────────┬──────────┘                   │                 │
//! │             └──────────────┬───────────────┘                 │
//! │                            │                                 │
//! │                     ┌──────▼──────┐                          │
//! │                     │ TextSource  │ (trait)                  │
//! │                     └──────┬──────┘                          │
//! └────────────────────────────┼─────────────────────────────────┘
//!                              │
//!                  ┌───────────┴───────────┐
//!                  │                       │
//!           ┌──────▼──────┐         ┌──────▼──────┐
//!           │ RealSource  │         │ MockSource  │
//!           │ (Linux)     │         │ (Testing)   │
//!           └─────────────┘         └─────────────┘
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod exec;
pub mod mock;
pub mod procfs;
pub mod traits;

pub use collector::Collector;
pub use exec::{CommandCollector, MountUsage, RankBy};
pub use mock::MockSource;
pub use procfs::{CollectError, ParseError, SystemCollector};
pub use traits::{CommandError, RealSource, TextSource};
