//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into the snapshot tables. They are designed to be easily testable with
//! string inputs.
//!
//! Line policy differs per format: meminfo skips malformed lines and
//! net/dev skips its headers, while a malformed sockstat or diskstats line
//! aborts the parse. Headers can legitimately appear among data lines; a
//! broken counter line means the whole table is suspect.

use std::collections::HashMap;

use crate::model::{DiskCounters, InterfaceCounters, LoadAvg};

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parses `/proc/meminfo` content into a field-name -> kilobytes table.
///
/// Each line is `Key:  value [kB]`; the trailing unit token is ignored.
/// Malformed lines (fewer than two tokens, non-numeric value) are skipped.
/// Succeeds only when `MemTotal` is present and positive, so downstream
/// ratios always have a usable denominator.
pub fn parse_meminfo(content: &str) -> Result<HashMap<String, f64>, ParseError> {
    let mut table = HashMap::new();

    for line in content.lines() {
        let mut tokens = line.split_whitespace();
        let (Some(key), Some(value)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let Ok(value) = value.parse::<f64>() else {
            continue;
        };
        table.insert(key.trim_end_matches(':').to_string(), value);
    }

    match table.get("MemTotal") {
        Some(total) if *total > 0.0 => Ok(table),
        Some(_) => Err(ParseError::new("meminfo: MemTotal is zero")),
        None => Err(ParseError::new("meminfo: MemTotal missing")),
    }
}

/// Parses `/proc/net/sockstat` / `/proc/net/sockstat6` content.
///
/// Format, one protocol per line:
/// `TCP: inuse 7 orphan 0 tw 2 alloc 9 mem 2`
///
/// The key is the first token with the trailing colon stripped and the
/// count is the third token. A non-empty line that does not fit this shape
/// is fatal: every line of this file is a counter line.
pub fn parse_sockstat(content: &str) -> Result<HashMap<String, u64>, ParseError> {
    let mut table = HashMap::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(ParseError::new(format!(
                "sockstat: expected 3+ fields, got {} in {:?}",
                tokens.len(),
                line
            )));
        }
        let count: u64 = tokens[2].parse().map_err(|_| {
            ParseError::new(format!("sockstat: non-numeric count in {:?}", line))
        })?;
        table.insert(tokens[0].trim_end_matches(':').to_string(), count);
    }

    Ok(table)
}

/// Parses `/proc/net/dev` content into an interface -> counters table.
///
/// Format:
/// Inter-|   Receive                                                |  Transmit
///  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
///    lo: 1234567     1234    0    0    0     0          0         0  1234567     1234    0    0    0     0       0          0
///
/// Header lines and lines too short to carry the transmit columns are
/// skipped; a counter that fails to parse on a data line is fatal.
pub fn parse_net_dev(content: &str) -> Result<HashMap<String, InterfaceCounters>, ParseError> {
    let mut table = HashMap::new();

    for line in content.lines() {
        if line.contains('|') || line.trim().is_empty() {
            continue;
        }
        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let values: Vec<&str> = counters.split_whitespace().collect();
        if values.len() < 10 {
            continue;
        }

        let field = |idx: usize, what: &str| -> Result<u64, ParseError> {
            values[idx].parse().map_err(|_| {
                ParseError::new(format!("net/dev: non-numeric {} for {}", what, name))
            })
        };

        table.insert(
            name.to_string(),
            InterfaceCounters {
                rx_bytes: field(0, "rx_bytes")?,
                rx_packets: field(1, "rx_packets")?,
                tx_bytes: field(8, "tx_bytes")?,
                tx_packets: field(9, "tx_packets")?,
            },
        );
    }

    Ok(table)
}

/// Parses `/proc/diskstats` content into a device -> counters table.
///
/// Format: major minor name reads r_merged r_sectors r_time writes
/// w_merged w_sectors w_time io_pending io_time w_io_time [discards ...]
///
/// Any non-empty line that does not carry the full counter set is fatal:
/// partial disk counters would silently skew every derived I/O figure.
pub fn parse_diskstats(content: &str) -> Result<HashMap<String, DiskCounters>, ParseError> {
    let mut table = HashMap::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 14 {
            return Err(ParseError::new(format!(
                "diskstats: expected 14+ fields, got {} in {:?}",
                tokens.len(),
                line
            )));
        }

        let device = tokens[2];
        let field = |idx: usize| -> Result<u64, ParseError> {
            tokens[idx].parse().map_err(|_| {
                ParseError::new(format!(
                    "diskstats: non-numeric field {} for {}",
                    idx, device
                ))
            })
        };

        let counters = DiskCounters {
            reads_issued: field(3)?,
            reads_merged: field(4)?,
            sectors_read: field(5)?,
            ms_reading: field(6)?,
            writes_completed: field(7)?,
            writes_merged: field(8)?,
            sectors_written: field(9)?,
            ms_writing: field(10)?,
            current_io: field(11)?,
            ms_io: field(12)?,
            ms_weighted_io: field(13)?,
        };
        table.insert(device.to_string(), counters);
    }

    Ok(table)
}

/// Parses `/proc/loadavg` content.
///
/// The file is a single line; anything short of the three load figures is
/// fatal.
pub fn parse_loadavg(content: &str) -> Result<LoadAvg, ParseError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ParseError::new("loadavg: expected 3+ fields"));
    }

    let figure = |idx: usize, which: &str| -> Result<f64, ParseError> {
        tokens[idx]
            .parse()
            .map_err(|_| ParseError::new(format!("loadavg: invalid {} figure", which)))
    };

    Ok(LoadAvg {
        one: figure(0, "one-minute")?,
        five: figure(1, "five-minute")?,
        fifteen: figure(2, "fifteen-minute")?,
    })
}

/// Parses the aggregate `cpu` line of `/proc/stat` into its tick counters.
///
/// Returns the numeric fields in kernel order (user, nice, system, idle,
/// iowait, ...). The aggregate line must be present and carry at least the
/// first four categories.
pub fn parse_cpu_ticks(content: &str) -> Result<Vec<u64>, ParseError> {
    let line = content
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| ParseError::new("stat: aggregate cpu line missing"))?;

    let ticks: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(|t| {
            t.parse()
                .map_err(|_| ParseError::new(format!("stat: non-numeric tick {:?}", t)))
        })
        .collect::<Result<_, _>>()?;

    if ticks.len() < 4 {
        return Err(ParseError::new(format!(
            "stat: expected 4+ tick fields, got {}",
            ticks.len()
        )));
    }

    Ok(ticks)
}
