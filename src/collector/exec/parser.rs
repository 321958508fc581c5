//! Parsers for the tabular output of external commands (`df`, `ps`).
//!
//! Command output is positional, so each parser declares the column layout
//! it expects and validates it before extracting anything. Layout drift in
//! a future coreutils/procps version then shows up as a `ParseError` in one
//! place instead of a silently wrong number.

use crate::collector::procfs::parser::ParseError;
use crate::model::ProcessSample;

/// Minimum column count of a `df` data row
/// (Filesystem, 1K-blocks, Used, Available, Use%, Mounted on).
pub const DF_MIN_COLUMNS: usize = 6;
/// Column index of the `Used` field in `df` output.
pub const DF_USED_COLUMN: usize = 2;
/// Column index of the `Use%` field in `df` output.
pub const DF_PERCENT_COLUMN: usize = 4;
/// Column count of the process listing (COMMAND, %CPU, %MEM).
pub const PS_MIN_COLUMNS: usize = 3;

/// Used space of one mounted filesystem, from a `df` data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountUsage {
    pub filesystem: String,
    pub used_kb: u64,
}

fn validate_df_header(lines: &mut std::str::Lines<'_>) -> Result<(), ParseError> {
    match lines.next() {
        Some(header) if header.starts_with("Filesystem") => Ok(()),
        Some(header) => Err(ParseError::new(format!(
            "df: unrecognized header {:?}",
            header
        ))),
        None => Err(ParseError::new("df: empty output")),
    }
}

/// Parses `df` output into per-mount used-space rows.
///
/// The `total` summary row (emitted under `--total`) is excluded, so the
/// result can be summed without double counting.
pub fn parse_df(content: &str) -> Result<Vec<MountUsage>, ParseError> {
    let mut lines = content.lines();
    validate_df_header(&mut lines)?;

    let mut mounts = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < DF_MIN_COLUMNS {
            return Err(ParseError::new(format!(
                "df: expected {}+ columns, got {} in {:?}",
                DF_MIN_COLUMNS,
                columns.len(),
                line
            )));
        }
        if columns[0] == "total" {
            continue;
        }
        let used_kb: u64 = columns[DF_USED_COLUMN].parse().map_err(|_| {
            ParseError::new(format!("df: non-numeric used column in {:?}", line))
        })?;
        mounts.push(MountUsage {
            filesystem: columns[0].to_string(),
            used_kb,
        });
    }

    Ok(mounts)
}

/// Extracts the overall used percentage from `df --total` output.
///
/// Reads the `Use%` column of the row whose first token is `total`; the
/// trailing `%` is stripped. A missing totals row is fatal.
pub fn parse_df_total_percent(content: &str) -> Result<f64, ParseError> {
    let mut lines = content.lines();
    validate_df_header(&mut lines)?;

    for line in lines {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.first() != Some(&"total") {
            continue;
        }
        if columns.len() <= DF_PERCENT_COLUMN {
            return Err(ParseError::new(format!(
                "df --total: expected {}+ columns in totals row, got {}",
                DF_PERCENT_COLUMN + 1,
                columns.len()
            )));
        }
        return columns[DF_PERCENT_COLUMN]
            .trim_end_matches('%')
            .parse()
            .map_err(|_| {
                ParseError::new(format!(
                    "df --total: non-numeric percentage {:?}",
                    columns[DF_PERCENT_COLUMN]
                ))
            });
    }

    Err(ParseError::new("df --total: totals row missing"))
}

/// Normalizes a command name from the process listing.
///
/// Kernel threads are reported as `[kworker/0:1]` and some entries carry a
/// full path; both are reduced to the bare name.
fn normalize_process_name(raw: &str) -> String {
    let name = raw
        .strip_prefix('[')
        .and_then(|n| n.strip_suffix(']'))
        .unwrap_or(raw);
    let name = name.rsplit('/').next().unwrap_or(name);
    name.to_string()
}

/// Parses `ps axo comm,pcpu,pmem` output into ranked process samples.
///
/// Rank order is the command's sort order and is preserved. The command
/// name may itself contain spaces, so the two percentage columns are taken
/// from the end of each row.
pub fn parse_process_table(content: &str) -> Result<Vec<ProcessSample>, ParseError> {
    let mut lines = content.lines();
    match lines.next() {
        Some(header) if header.contains("%CPU") && header.contains("%MEM") => {}
        Some(header) => {
            return Err(ParseError::new(format!(
                "ps: unrecognized header {:?}",
                header
            )));
        }
        None => return Err(ParseError::new("ps: empty output")),
    }

    let mut samples = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() < PS_MIN_COLUMNS {
            return Err(ParseError::new(format!(
                "ps: expected {}+ columns, got {} in {:?}",
                PS_MIN_COLUMNS,
                columns.len(),
                line
            )));
        }

        let percentage = |idx: usize, what: &str| -> Result<f64, ParseError> {
            columns[idx]
                .parse()
                .map_err(|_| ParseError::new(format!("ps: non-numeric {} in {:?}", what, line)))
        };
        let cpu_percent = percentage(columns.len() - 2, "%CPU")?;
        let mem_percent = percentage(columns.len() - 1, "%MEM")?;
        let name = normalize_process_name(&columns[..columns.len() - 2].join(" "));

        samples.push(ProcessSample {
            name,
            cpu_percent,
            mem_percent,
        });
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DF_OUTPUT: &str = "\
Filesystem     1K-blocks      Used Available Use% Mounted on
/dev/sda1       51474912  21474836  27350948  44% /
/dev/nvme0n1p1 103081248  51540624  46299240  53% /data
tmpfs            8192000         0   8192000   0% /dev/shm
";

    const DF_TOTAL_OUTPUT: &str = "\
Filesystem     1K-blocks      Used Available Use% Mounted on
/dev/sda1       51474912  21474836  27350948  44% /
/dev/nvme0n1p1 103081248  51540624  46299240  53% /data
tmpfs            8192000         0   8192000   0% /dev/shm
total          162748160  73015460  81842188  48% -
";

    #[test]
    fn test_parse_df() {
        let mounts = parse_df(DF_OUTPUT).unwrap();

        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts[0].filesystem, "/dev/sda1");
        assert_eq!(mounts[0].used_kb, 21474836);
        assert_eq!(mounts[1].used_kb, 51540624);
        assert_eq!(mounts[2].used_kb, 0);
    }

    #[test]
    fn test_parse_df_excludes_totals_row() {
        let mounts = parse_df(DF_TOTAL_OUTPUT).unwrap();

        assert_eq!(mounts.len(), 3);
        assert!(mounts.iter().all(|m| m.filesystem != "total"));
    }

    #[test]
    fn test_parse_df_mount_point_with_spaces() {
        let content = "\
Filesystem     1K-blocks      Used Available Use% Mounted on
/dev/sdb1        1024000    512000    512000  50% /mnt/usb drive
";
        let mounts = parse_df(content).unwrap();
        assert_eq!(mounts[0].used_kb, 512000);
    }

    #[test]
    fn test_parse_df_shape_drift_is_fatal() {
        // A wrapped row (long device name split across lines) must fail
        // loudly rather than corrupt the sum.
        let content = "\
Filesystem     1K-blocks      Used Available Use% Mounted on
/dev/mapper/very-long-volume-name
                51474912  21474836  27350948  44% /
";
        assert!(parse_df(content).is_err());
    }

    #[test]
    fn test_parse_df_unrecognized_header_is_fatal() {
        let content = "Dateisystem 1K-Blöcke Benutzt Verfügbar Verw% Eingehängt auf\n";
        assert!(parse_df(content).is_err());
        assert!(parse_df("").is_err());
    }

    #[test]
    fn test_parse_df_total_percent() {
        let percent = parse_df_total_percent(DF_TOTAL_OUTPUT).unwrap();
        assert!((percent - 48.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_df_total_percent_missing_row_is_fatal() {
        // Plain `df` output has no totals row
        assert!(parse_df_total_percent(DF_OUTPUT).is_err());
    }

    #[test]
    fn test_parse_process_table() {
        let content = "\
COMMAND         %CPU %MEM
postgres        42.3  8.1
[kworker/0:1]    3.0  0.0
/usr/bin/redis-server  2.5  1.2
bash             0.3  0.1
";
        let samples = parse_process_table(content).unwrap();

        assert_eq!(samples.len(), 4);
        // Rank order preserved
        assert_eq!(samples[0].name, "postgres");
        assert!((samples[0].cpu_percent - 42.3).abs() < 0.001);
        assert!((samples[0].mem_percent - 8.1).abs() < 0.001);
        // Kernel thread brackets stripped
        assert_eq!(samples[1].name, "kworker/0:1");
        // Path prefix dropped
        assert_eq!(samples[2].name, "redis-server");
    }

    #[test]
    fn test_parse_process_table_name_with_spaces() {
        let content = "\
COMMAND         %CPU %MEM
Web Content      5.5  6.4
";
        let samples = parse_process_table(content).unwrap();
        assert_eq!(samples[0].name, "Web Content");
        assert!((samples[0].cpu_percent - 5.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_process_table_rejects_unknown_header() {
        assert!(parse_process_table("PID TTY TIME CMD\n").is_err());
        assert!(parse_process_table("").is_err());
    }

    #[test]
    fn test_parse_process_table_non_numeric_is_fatal() {
        let content = "\
COMMAND         %CPU %MEM
postgres        high  8.1
";
        assert!(parse_process_table(content).is_err());
    }
}
