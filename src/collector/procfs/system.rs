//! System collector for gathering global resource tables from `/proc/`.

use std::collections::HashMap;
use std::path::Path;

use crate::collector::procfs::parser::{
    parse_cpu_ticks, parse_diskstats, parse_loadavg, parse_meminfo, parse_net_dev,
    parse_sockstat,
};
use crate::collector::traits::{CommandError, TextSource};
use crate::model::{DiskCounters, InterfaceCounters, LoadAvg};

/// Error type for acquisition failures.
///
/// Acquisition failures are typed so callers can tell an unreadable source
/// (file or command) apart from content that did not match the expected
/// shape.
#[derive(Debug)]
pub enum CollectError {
    /// I/O error reading a kernel pseudo-file.
    Io(std::io::Error),
    /// An external command could not be run or failed.
    Command(CommandError),
    /// Content did not match the expected shape.
    Parse(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Command(e) => write!(f, "command error: {}", e),
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}

impl From<CommandError> for CollectError {
    fn from(e: CommandError) -> Self {
        CollectError::Command(e)
    }
}

/// Collects system-wide resource tables from `/proc/`.
pub struct SystemCollector<S: TextSource> {
    source: S,
    proc_path: String,
}

impl<S: TextSource> SystemCollector<S> {
    /// Creates a new system collector.
    ///
    /// # Arguments
    /// * `source` - Text source implementation (real or mock)
    /// * `proc_path` - Base path to the proc filesystem (usually "/proc")
    pub fn new(source: S, proc_path: impl Into<String>) -> Self {
        Self {
            source,
            proc_path: proc_path.into(),
        }
    }

    fn read(&self, relative: &str) -> Result<String, CollectError> {
        let path = format!("{}/{}", self.proc_path, relative);
        Ok(self.source.read_to_string(Path::new(&path))?)
    }

    /// Collects the memory table from `/proc/meminfo`.
    pub fn collect_meminfo(&self) -> Result<HashMap<String, f64>, CollectError> {
        let content = self.read("meminfo")?;
        parse_meminfo(&content).map_err(|e| CollectError::Parse(e.message))
    }

    /// Collects IPv4 socket counts from `/proc/net/sockstat`.
    pub fn collect_sockstat(&self) -> Result<HashMap<String, u64>, CollectError> {
        let content = self.read("net/sockstat")?;
        parse_sockstat(&content).map_err(|e| CollectError::Parse(e.message))
    }

    /// Collects IPv6 socket counts from `/proc/net/sockstat6`.
    pub fn collect_sockstat6(&self) -> Result<HashMap<String, u64>, CollectError> {
        let content = self.read("net/sockstat6")?;
        parse_sockstat(&content).map_err(|e| CollectError::Parse(e.message))
    }

    /// Collects per-interface traffic counters from `/proc/net/dev`.
    pub fn collect_net_dev(&self) -> Result<HashMap<String, InterfaceCounters>, CollectError> {
        let content = self.read("net/dev")?;
        parse_net_dev(&content).map_err(|e| CollectError::Parse(e.message))
    }

    /// Collects per-device I/O counters from `/proc/diskstats`.
    pub fn collect_diskstats(&self) -> Result<HashMap<String, DiskCounters>, CollectError> {
        let content = self.read("diskstats")?;
        parse_diskstats(&content).map_err(|e| CollectError::Parse(e.message))
    }

    /// Collects load averages from `/proc/loadavg`.
    pub fn collect_loadavg(&self) -> Result<LoadAvg, CollectError> {
        let content = self.read("loadavg")?;
        parse_loadavg(&content).map_err(|e| CollectError::Parse(e.message))
    }

    /// Collects the aggregate CPU tick counters from `/proc/stat`.
    pub fn collect_cpu_ticks(&self) -> Result<Vec<u64>, CollectError> {
        let content = self.read("stat")?;
        parse_cpu_ticks(&content).map_err(|e| CollectError::Parse(e.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockSource;

    #[test]
    fn test_collect_meminfo() {
        let source = MockSource::typical_host();
        let collector = SystemCollector::new(source, "/proc");

        let mem = collector.collect_meminfo().unwrap();

        assert_eq!(mem["MemTotal"], 16384000.0);
        assert_eq!(mem["Active"], 4096000.0);
    }

    #[test]
    fn test_collect_sockstat_both_families() {
        let source = MockSource::typical_host();
        let collector = SystemCollector::new(source, "/proc");

        let v4 = collector.collect_sockstat().unwrap();
        let v6 = collector.collect_sockstat6().unwrap();

        assert_eq!(v4["TCP"], 3);
        assert_eq!(v4["UDP"], 4);
        assert_eq!(v6["TCP6"], 2);
        assert_eq!(v6["UDP6"], 1);
    }

    #[test]
    fn test_collect_net_dev() {
        let source = MockSource::typical_host();
        let collector = SystemCollector::new(source, "/proc");

        let net = collector.collect_net_dev().unwrap();

        assert_eq!(net.len(), 2);
        assert_eq!(net["eth0"].rx_bytes, 2048);
        assert_eq!(net["eth0"].tx_bytes, 4096);
    }

    #[test]
    fn test_collect_diskstats() {
        let source = MockSource::typical_host();
        let collector = SystemCollector::new(source, "/proc");

        let disks = collector.collect_diskstats().unwrap();

        assert_eq!(disks["sda"].reads_issued, 12345);
        assert_eq!(disks["sda"].writes_completed, 6789);
    }

    #[test]
    fn test_collect_loadavg() {
        let source = MockSource::typical_host();
        let collector = SystemCollector::new(source, "/proc");

        let load = collector.collect_loadavg().unwrap();

        assert!((load.one - 0.15).abs() < 0.001);
        assert!((load.fifteen - 0.05).abs() < 0.001);
    }

    #[test]
    fn test_collect_cpu_ticks() {
        let source = MockSource::typical_host();
        let collector = SystemCollector::new(source, "/proc");

        let ticks = collector.collect_cpu_ticks().unwrap();

        assert_eq!(ticks[0], 10000);
        assert_eq!(ticks[3], 80000);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = MockSource::new();
        let collector = SystemCollector::new(source, "/proc");

        let result = collector.collect_meminfo();
        assert!(matches!(result, Err(CollectError::Io(_))));
    }

    #[test]
    fn test_custom_proc_path() {
        let mut source = MockSource::new();
        source.add_file("/custom/loadavg", "1.00 2.00 3.00 2/100 999\n");
        let collector = SystemCollector::new(source, "/custom");

        let load = collector.collect_loadavg().unwrap();
        assert!((load.one - 1.00).abs() < 0.001);
    }
}
