//! Data model for one point-in-time resource snapshot.
//!
//! Every table is a keyed mapping with no cross-references; derivations
//! join across tables by the caller providing a key (a device name, a
//! meminfo field). The snapshot is built whole by the collector and never
//! mutated after publication.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Receive/transmit counters for one network interface.
/// Source: `/proc/net/dev`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceCounters {
    /// Bytes received since boot.
    pub rx_bytes: u64,
    /// Packets received since boot.
    pub rx_packets: u64,
    /// Bytes transmitted since boot.
    pub tx_bytes: u64,
    /// Packets transmitted since boot.
    pub tx_packets: u64,
}

/// I/O counters for one block device.
/// Source: `/proc/diskstats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskCounters {
    /// Reads completed successfully.
    pub reads_issued: u64,
    /// Reads merged before queuing.
    pub reads_merged: u64,
    /// Sectors read.
    pub sectors_read: u64,
    /// Time spent reading (ms).
    pub ms_reading: u64,
    /// Writes completed.
    pub writes_completed: u64,
    /// Writes merged before queuing.
    pub writes_merged: u64,
    /// Sectors written.
    pub sectors_written: u64,
    /// Time spent writing (ms).
    pub ms_writing: u64,
    /// I/Os currently in progress.
    pub current_io: u64,
    /// Time spent doing I/O (ms).
    pub ms_io: u64,
    /// Weighted time spent doing I/O (ms).
    pub ms_weighted_io: u64,
}

/// Load averages.
/// Source: `/proc/loadavg`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAvg {
    /// 1-minute load average.
    pub one: f64,
    /// 5-minute load average.
    pub five: f64,
    /// 15-minute load average.
    pub fifteen: f64,
}

/// One ranked row from the process listing.
///
/// Produced per query by the process-listing collector and never stored in
/// the snapshot: process state is always re-queried live.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    /// Normalized command name.
    pub name: String,
    /// CPU usage as reported by the process listing (percent).
    pub cpu_percent: f64,
    /// Resident memory share as reported by the process listing (percent).
    pub mem_percent: f64,
}

/// A point-in-time capture of all parsed resource tables.
///
/// Built whole by a single acquisition pass and published behind `Arc`;
/// a refresh produces a brand-new snapshot rather than mutating this one,
/// so consumers holding a reference keep an internally consistent view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unix timestamp (seconds since epoch) when this snapshot was taken.
    pub timestamp: i64,

    /// Memory fields in kilobytes, keyed by field name.
    /// Source: `/proc/meminfo`
    pub mem: HashMap<String, f64>,

    /// IPv4 socket counts keyed by protocol label ("TCP", "UDP", ...).
    /// Source: `/proc/net/sockstat`
    pub sockets_v4: HashMap<String, u64>,

    /// IPv6 socket counts keyed by protocol label ("TCP6", "UDP6", ...).
    /// Source: `/proc/net/sockstat6`
    pub sockets_v6: HashMap<String, u64>,

    /// Per-interface traffic counters keyed by interface name.
    /// Source: `/proc/net/dev`
    pub net: HashMap<String, InterfaceCounters>,

    /// Per-device I/O counters keyed by block device name.
    /// Source: `/proc/diskstats`
    pub disks: HashMap<String, DiskCounters>,

    /// Load averages.
    /// Source: `/proc/loadavg`
    pub load: LoadAvg,

    /// Aggregate CPU tick counters in kernel order
    /// (user, nice, system, idle, iowait, ...).
    /// Source: the `cpu` line of `/proc/stat`
    pub cpu_ticks: Vec<u64>,
}
