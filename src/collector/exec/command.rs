//! Collector for metrics acquired by running external commands.
//!
//! Disk-space figures and process rankings are never cached in a snapshot:
//! each query runs the command again and parses its captured stdout. The
//! argv for every command lives here, next to the parser that understands
//! its output, so a layout assumption has a single point of change.

use crate::collector::exec::parser::{parse_df, parse_df_total_percent, parse_process_table};
use crate::collector::procfs::system::CollectError;
use crate::collector::traits::TextSource;
use crate::model::ProcessSample;

pub use crate::collector::exec::parser::MountUsage;

/// Ranking column for the process listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Cpu,
    Memory,
}

/// Runs the disk-space and process-listing commands and parses their output.
pub struct CommandCollector<S: TextSource> {
    source: S,
}

impl<S: TextSource> CommandCollector<S> {
    /// Creates a new command collector.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Per-mount used space from `df`.
    pub fn disk_mounts(&self) -> Result<Vec<MountUsage>, CollectError> {
        let stdout = self.source.run_command(&["df"])?;
        parse_df(&stdout).map_err(|e| CollectError::Parse(e.message))
    }

    /// Overall used percentage from the totals row of `df --total`.
    pub fn disk_used_percent(&self) -> Result<f64, CollectError> {
        let stdout = self.source.run_command(&["df", "--total"])?;
        parse_df_total_percent(&stdout).map_err(|e| CollectError::Parse(e.message))
    }

    /// The top `limit` processes ranked by the given column.
    ///
    /// Projection and ordering are done by the command itself; only the row
    /// limit and name normalization happen here. Duplicate names keep their
    /// first rank position with the value of the last occurrence (mapping
    /// semantics).
    pub fn processes(
        &self,
        rank: RankBy,
        limit: usize,
    ) -> Result<Vec<ProcessSample>, CollectError> {
        let sort = match rank {
            RankBy::Cpu => "--sort=-pcpu",
            RankBy::Memory => "--sort=-pmem",
        };
        let stdout = self
            .source
            .run_command(&["ps", "axo", "comm,pcpu,pmem", sort])?;
        let rows = parse_process_table(&stdout).map_err(|e| CollectError::Parse(e.message))?;

        let mut samples: Vec<ProcessSample> = Vec::new();
        for row in rows.into_iter().take(limit) {
            if let Some(existing) = samples.iter_mut().find(|s| s.name == row.name) {
                existing.cpu_percent = row.cpu_percent;
                existing.mem_percent = row.mem_percent;
            } else {
                samples.push(row);
            }
        }

        Ok(samples)
    }
}
