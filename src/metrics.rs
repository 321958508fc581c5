//! Pure derivations over a populated snapshot.
//!
//! This module is the single source of truth for every computed metric:
//! the engine's query surface delegates here. No function performs I/O,
//! so each one is trivially testable against hand-built snapshots.
//!
//! A missing table key is always a typed error, never a silent zero, and
//! a derivation failure never invalidates the snapshot it ran against.

use std::collections::HashMap;

use crate::model::{DiskCounters, InterfaceCounters, Snapshot};

/// Offsets of the "used" CPU tick categories (user, nice, system).
const CPU_USED_TICKS: std::ops::Range<usize> = 0..3;
/// Offset of the idle CPU tick category.
const CPU_IDLE_TICK: usize = 3;

/// Error type for derivation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricError {
    /// A query ran before any successful refresh.
    NotRefreshed,
    /// A derivation referenced a table key absent from the snapshot.
    MissingKey { table: &'static str, key: String },
    /// A ratio denominator was zero.
    ZeroDenominator { table: &'static str, key: String },
    /// A device-less bandwidth query ran with no configured device.
    DeviceNotConfigured,
}

impl MetricError {
    fn missing(table: &'static str, key: impl Into<String>) -> Self {
        MetricError::MissingKey {
            table,
            key: key.into(),
        }
    }

    fn zero(table: &'static str, key: impl Into<String>) -> Self {
        MetricError::ZeroDenominator {
            table,
            key: key.into(),
        }
    }
}

impl std::fmt::Display for MetricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricError::NotRefreshed => write!(f, "no snapshot has been collected yet"),
            MetricError::MissingKey { table, key } => {
                write!(f, "key {:?} not present in {} table", key, table)
            }
            MetricError::ZeroDenominator { table, key } => {
                write!(f, "zero denominator: {} {:?}", table, key)
            }
            MetricError::DeviceNotConfigured => {
                write!(f, "no network device configured")
            }
        }
    }
}

impl std::error::Error for MetricError {}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Expresses a ratio as a percentage rounded to two decimal places.
pub fn percent(ratio: f64) -> f64 {
    round2(ratio * 100.0)
}

fn mem_field(snapshot: &Snapshot, key: &str) -> Result<f64, MetricError> {
    snapshot
        .mem
        .get(key)
        .copied()
        .ok_or_else(|| MetricError::missing("meminfo", key))
}

fn socket_count(
    table: &HashMap<String, u64>,
    table_name: &'static str,
    key: &str,
) -> Result<u64, MetricError> {
    table
        .get(key)
        .copied()
        .ok_or_else(|| MetricError::missing(table_name, key))
}

fn interface<'a>(
    snapshot: &'a Snapshot,
    device: &str,
) -> Result<&'a InterfaceCounters, MetricError> {
    snapshot
        .net
        .get(device)
        .ok_or_else(|| MetricError::missing("net/dev", device))
}

fn disk<'a>(snapshot: &'a Snapshot, device: &str) -> Result<&'a DiskCounters, MetricError> {
    snapshot
        .disks
        .get(device)
        .ok_or_else(|| MetricError::missing("diskstats", device))
}

/// Fraction of total memory counted as active, rounded to two decimals.
pub fn memory_used(snapshot: &Snapshot) -> Result<f64, MetricError> {
    let active = mem_field(snapshot, "Active")?;
    let total = mem_field(snapshot, "MemTotal")?;
    if total == 0.0 {
        return Err(MetricError::zero("meminfo", "MemTotal"));
    }
    Ok(round2(active / total))
}

/// Current TCP connection count across both address families.
pub fn tcp_connections(snapshot: &Snapshot) -> Result<u64, MetricError> {
    let v4 = socket_count(&snapshot.sockets_v4, "sockstat", "TCP")?;
    let v6 = socket_count(&snapshot.sockets_v6, "sockstat6", "TCP6")?;
    Ok(v4 + v6)
}

/// Current UDP connection count across both address families.
pub fn udp_connections(snapshot: &Snapshot) -> Result<u64, MetricError> {
    let v4 = socket_count(&snapshot.sockets_v4, "sockstat", "UDP")?;
    let v6 = socket_count(&snapshot.sockets_v6, "sockstat6", "UDP6")?;
    Ok(v4 + v6)
}

/// Kilobytes received on the given interface since boot.
pub fn bandwidth_rx(snapshot: &Snapshot, device: &str) -> Result<f64, MetricError> {
    Ok(interface(snapshot, device)?.rx_bytes as f64 / 1024.0)
}

/// Kilobytes transmitted on the given interface since boot.
pub fn bandwidth_tx(snapshot: &Snapshot, device: &str) -> Result<f64, MetricError> {
    Ok(interface(snapshot, device)?.tx_bytes as f64 / 1024.0)
}

/// Reads completed by the given block device since boot.
pub fn disk_reads(snapshot: &Snapshot, device: &str) -> Result<u64, MetricError> {
    Ok(disk(snapshot, device)?.reads_issued)
}

/// Writes completed by the given block device since boot.
pub fn disk_writes(snapshot: &Snapshot, device: &str) -> Result<u64, MetricError> {
    Ok(disk(snapshot, device)?.writes_completed)
}

fn cpu_used_from_ticks(used: u64, idle: u64) -> Result<f64, MetricError> {
    let total = used + idle;
    if total == 0 {
        return Err(MetricError::zero("stat", "cpu"));
    }
    Ok(percent(used as f64 / total as f64))
}

fn split_ticks(ticks: &[u64]) -> Result<(u64, u64), MetricError> {
    if ticks.len() <= CPU_IDLE_TICK {
        return Err(MetricError::missing("stat", "cpu"));
    }
    let used: u64 = ticks[CPU_USED_TICKS].iter().sum();
    Ok((used, ticks[CPU_IDLE_TICK]))
}

/// CPU usage percentage computed from the snapshot's single tick sample.
///
/// Tick counters accumulate from boot, so this is a since-boot average,
/// not an instantaneous figure. Use [`cpu_used_percent_between`] with two
/// time-separated snapshots for the instantaneous one.
pub fn cpu_used_percent(snapshot: &Snapshot) -> Result<f64, MetricError> {
    let (used, idle) = split_ticks(&snapshot.cpu_ticks)?;
    cpu_used_from_ticks(used, idle)
}

/// Instantaneous CPU usage percentage between two snapshots.
///
/// Counter regressions (reboot between samples) clamp to zero; identical
/// samples have no elapsed ticks to attribute and fail with
/// `ZeroDenominator`.
pub fn cpu_used_percent_between(
    previous: &Snapshot,
    current: &Snapshot,
) -> Result<f64, MetricError> {
    let (prev_used, prev_idle) = split_ticks(&previous.cpu_ticks)?;
    let (curr_used, curr_idle) = split_ticks(&current.cpu_ticks)?;
    cpu_used_from_ticks(
        curr_used.saturating_sub(prev_used),
        curr_idle.saturating_sub(prev_idle),
    )
}

/// The 1-minute load average expressed as a percentage of one core.
pub fn load_average(snapshot: &Snapshot) -> f64 {
    percent(snapshot.load.one)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoadAvg;

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot {
            timestamp: 1700000000,
            load: LoadAvg {
                one: 0.15,
                five: 0.10,
                fifteen: 0.05,
            },
            cpu_ticks: vec![10000, 500, 3000, 80000, 1000, 200, 100, 0, 0, 0],
            ..Snapshot::default()
        };
        snapshot.mem.insert("MemTotal".to_string(), 1000000.0);
        snapshot.mem.insert("Active".to_string(), 500000.0);
        snapshot.sockets_v4.insert("TCP".to_string(), 3);
        snapshot.sockets_v4.insert("UDP".to_string(), 4);
        snapshot.sockets_v6.insert("TCP6".to_string(), 2);
        snapshot.sockets_v6.insert("UDP6".to_string(), 1);
        snapshot.net.insert(
            "eth0".to_string(),
            InterfaceCounters {
                rx_bytes: 2048,
                rx_packets: 16,
                tx_bytes: 4096,
                tx_packets: 32,
            },
        );
        snapshot.disks.insert(
            "sda".to_string(),
            DiskCounters {
                reads_issued: 12345,
                writes_completed: 6789,
                ..DiskCounters::default()
            },
        );
        snapshot
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.5), 50.0);
        assert_eq!(percent(0.12345), 12.35);
        assert_eq!(percent(0.0), 0.0);
    }

    #[test]
    fn test_memory_used() {
        assert_eq!(memory_used(&snapshot()).unwrap(), 0.5);
    }

    #[test]
    fn test_memory_used_missing_field() {
        let mut snap = snapshot();
        snap.mem.remove("Active");

        let err = memory_used(&snap).unwrap_err();
        assert_eq!(
            err,
            MetricError::MissingKey {
                table: "meminfo",
                key: "Active".to_string()
            }
        );
    }

    #[test]
    fn test_memory_used_zero_total() {
        let mut snap = snapshot();
        snap.mem.insert("MemTotal".to_string(), 0.0);

        assert!(matches!(
            memory_used(&snap),
            Err(MetricError::ZeroDenominator { .. })
        ));
    }

    #[test]
    fn test_tcp_connections() {
        assert_eq!(tcp_connections(&snapshot()).unwrap(), 5);
    }

    #[test]
    fn test_udp_connections() {
        assert_eq!(udp_connections(&snapshot()).unwrap(), 5);
    }

    #[test]
    fn test_connections_missing_key() {
        let mut snap = snapshot();
        snap.sockets_v6.remove("TCP6");

        assert!(matches!(
            tcp_connections(&snap),
            Err(MetricError::MissingKey { table: "sockstat6", .. })
        ));
    }

    #[test]
    fn test_bandwidth() {
        let snap = snapshot();
        assert_eq!(bandwidth_rx(&snap, "eth0").unwrap(), 2.0);
        assert_eq!(bandwidth_tx(&snap, "eth0").unwrap(), 4.0);
    }

    #[test]
    fn test_bandwidth_unknown_device_is_error_not_zero() {
        let err = bandwidth_rx(&snapshot(), "nonexistent0").unwrap_err();
        assert_eq!(
            err,
            MetricError::MissingKey {
                table: "net/dev",
                key: "nonexistent0".to_string()
            }
        );
    }

    #[test]
    fn test_disk_counters() {
        let snap = snapshot();
        assert_eq!(disk_reads(&snap, "sda").unwrap(), 12345);
        assert_eq!(disk_writes(&snap, "sda").unwrap(), 6789);
        assert!(disk_reads(&snap, "sdz").is_err());
    }

    #[test]
    fn test_cpu_used_percent_since_boot() {
        // used = 10000 + 500 + 3000 = 13500, idle = 80000
        // 13500 / 93500 = 0.14438... -> 14.44
        assert_eq!(cpu_used_percent(&snapshot()).unwrap(), 14.44);
    }

    #[test]
    fn test_cpu_used_percent_short_ticks() {
        let mut snap = snapshot();
        snap.cpu_ticks = vec![100, 200, 300];

        assert!(matches!(
            cpu_used_percent(&snap),
            Err(MetricError::MissingKey { table: "stat", .. })
        ));
    }

    #[test]
    fn test_cpu_used_percent_between() {
        let mut prev = snapshot();
        prev.cpu_ticks = vec![100, 0, 50, 850];
        let mut curr = snapshot();
        curr.cpu_ticks = vec![200, 0, 100, 1700];

        // deltas: used 150, idle 850 -> 15.0
        assert_eq!(cpu_used_percent_between(&prev, &curr).unwrap(), 15.0);
    }

    #[test]
    fn test_cpu_used_percent_between_identical_samples() {
        let snap = snapshot();
        assert!(matches!(
            cpu_used_percent_between(&snap, &snap),
            Err(MetricError::ZeroDenominator { .. })
        ));
    }

    #[test]
    fn test_load_average() {
        assert_eq!(load_average(&snapshot()), 15.0);
    }
}
