//! Collectors for metrics obtained from external command output.

pub mod command;
pub mod parser;

pub use command::{CommandCollector, RankBy};
pub use parser::MountUsage;
