//! Snapshot lifecycle and the public query surface.
//!
//! `UsageEngine` owns the collectors and the currently active snapshot.
//! `refresh` builds a brand-new snapshot and swaps it in whole; there is
//! no partial mutation, so a consumer holding a reference to snapshot N
//! observes nothing while snapshot N+1 is produced. On a failed refresh
//! the previous snapshot stays active.

use std::sync::Arc;

use tracing::debug;

use crate::collector::{CollectError, Collector, CommandCollector, RankBy, TextSource};
use crate::config::EngineConfig;
use crate::metrics::{self, MetricError, round2};
use crate::model::{ProcessSample, Snapshot};

/// One-shot resource usage engine: refresh, then query derived metrics.
pub struct UsageEngine<S: TextSource + Clone> {
    collector: Collector<S>,
    commands: CommandCollector<S>,
    config: EngineConfig,
    current: Option<Arc<Snapshot>>,
}

impl<S: TextSource + Clone> UsageEngine<S> {
    /// Creates an engine with no active snapshot.
    ///
    /// Snapshot-backed queries fail with `MetricError::NotRefreshed` until
    /// the first successful [`refresh`](Self::refresh).
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self {
            collector: Collector::new(source.clone(), &config.proc_path),
            commands: CommandCollector::new(source),
            config,
            current: None,
        }
    }

    /// Acquires a fresh snapshot and atomically replaces the active one.
    ///
    /// All required sources are read in one pass; any failure aborts the
    /// refresh and leaves the previously published snapshot in place.
    pub fn refresh(&mut self) -> Result<Arc<Snapshot>, CollectError> {
        let snapshot = Arc::new(self.collector.collect_snapshot()?);
        self.current = Some(Arc::clone(&snapshot));
        debug!("refreshed snapshot at {}", snapshot.timestamp);
        Ok(snapshot)
    }

    /// The currently active snapshot.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, MetricError> {
        self.current.clone().ok_or(MetricError::NotRefreshed)
    }

    fn active(&self) -> Result<&Snapshot, MetricError> {
        self.current.as_deref().ok_or(MetricError::NotRefreshed)
    }

    /// Fraction of total memory counted as active.
    pub fn memory_used(&self) -> Result<f64, MetricError> {
        metrics::memory_used(self.active()?)
    }

    /// TCP connection count across both address families.
    pub fn tcp_connections(&self) -> Result<u64, MetricError> {
        metrics::tcp_connections(self.active()?)
    }

    /// UDP connection count across both address families.
    pub fn udp_connections(&self) -> Result<u64, MetricError> {
        metrics::udp_connections(self.active()?)
    }

    /// Since-boot CPU usage percentage.
    pub fn cpu_used_percent(&self) -> Result<f64, MetricError> {
        metrics::cpu_used_percent(self.active()?)
    }

    /// 1-minute load average as a percentage of one core.
    pub fn load_average(&self) -> Result<f64, MetricError> {
        Ok(metrics::load_average(self.active()?))
    }

    /// Kilobytes received on the configured interface.
    pub fn bandwidth_rx(&self) -> Result<f64, MetricError> {
        self.bandwidth_rx_for(self.configured_device()?)
    }

    /// Kilobytes transmitted on the configured interface.
    pub fn bandwidth_tx(&self) -> Result<f64, MetricError> {
        self.bandwidth_tx_for(self.configured_device()?)
    }

    /// Kilobytes received on an explicitly named interface.
    pub fn bandwidth_rx_for(&self, device: &str) -> Result<f64, MetricError> {
        metrics::bandwidth_rx(self.active()?, device)
    }

    /// Kilobytes transmitted on an explicitly named interface.
    pub fn bandwidth_tx_for(&self, device: &str) -> Result<f64, MetricError> {
        metrics::bandwidth_tx(self.active()?, device)
    }

    /// Reads completed by the named block device.
    pub fn disk_reads(&self, device: &str) -> Result<u64, MetricError> {
        metrics::disk_reads(self.active()?, device)
    }

    /// Writes completed by the named block device.
    pub fn disk_writes(&self, device: &str) -> Result<u64, MetricError> {
        metrics::disk_writes(self.active()?, device)
    }

    fn configured_device(&self) -> Result<&str, MetricError> {
        self.config
            .device
            .as_deref()
            .ok_or(MetricError::DeviceNotConfigured)
    }

    /// Gigabytes used across all mounted filesystems.
    ///
    /// Live query: runs `df` on every call, never cached in the snapshot.
    pub fn disk_used_gb(&self) -> Result<f64, CollectError> {
        let mounts = self.commands.disk_mounts()?;
        let used_kb: u64 = mounts.iter().map(|m| m.used_kb).sum();
        Ok(round2(used_kb as f64 / 1024.0 / 1024.0))
    }

    /// Overall used-space percentage from `df --total`.
    ///
    /// Live query: runs the command on every call.
    pub fn disk_used_percentage(&self) -> Result<f64, CollectError> {
        self.commands.disk_used_percent()
    }

    /// The top `n` processes by CPU usage.
    ///
    /// Live query: process state is always re-queried, never cached.
    pub fn top_cpu_processes(&self, n: usize) -> Result<Vec<ProcessSample>, CollectError> {
        self.commands.processes(RankBy::Cpu, n)
    }

    /// The top `n` processes by resident memory share.
    ///
    /// Live query: process state is always re-queried, never cached.
    pub fn top_memory_processes(&self, n: usize) -> Result<Vec<ProcessSample>, CollectError> {
        self.commands.processes(RankBy::Memory, n)
    }
}
