//! Main collector that assembles one complete snapshot.
//!
//! Every source listed here is required: if any acquisition or parse
//! fails the whole snapshot is abandoned, so a partially populated
//! snapshot can never be observed by derivation code.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::collector::procfs::{CollectError, SystemCollector};
use crate::collector::traits::TextSource;
use crate::model::Snapshot;

/// Acquires all required sources and assembles snapshots.
pub struct Collector<S: TextSource> {
    system: SystemCollector<S>,
}

impl<S: TextSource> Collector<S> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `source` - Text source implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(source: S, proc_path: impl Into<String>) -> Self {
        Self {
            system: SystemCollector::new(source, proc_path),
        }
    }

    /// Collects a complete snapshot of all resource tables.
    ///
    /// Acquisitions run in a fixed order; the first failure aborts the
    /// whole pass and nothing is returned.
    pub fn collect_snapshot(&self) -> Result<Snapshot, CollectError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        let mem = self.system.collect_meminfo()?;
        let sockets_v4 = self.system.collect_sockstat()?;
        let sockets_v6 = self.system.collect_sockstat6()?;
        let net = self.system.collect_net_dev()?;
        let disks = self.system.collect_diskstats()?;
        let load = self.system.collect_loadavg()?;
        let cpu_ticks = self.system.collect_cpu_ticks()?;

        debug!(
            "snapshot: {} meminfo fields, {} interfaces, {} disks",
            mem.len(),
            net.len(),
            disks.len()
        );

        Ok(Snapshot {
            timestamp,
            mem,
            sockets_v4,
            sockets_v6,
            net,
            disks,
            load,
            cpu_ticks,
        })
    }
}
