//! hostwatch - one-shot host resource usage report.
//!
//! Takes a single snapshot of the local host and prints the derived
//! metrics, either human-readable or as JSON.

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use tracing::{Level, error, warn};
use tracing_subscriber::EnvFilter;

use hostwatch::{EngineConfig, ProcessSample, RealSource, UsageEngine};

/// One-shot host resource usage report.
#[derive(Parser)]
#[command(name = "hostwatch", about = "Point-in-time host resource usage report", version)]
struct Args {
    /// Path to the proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Network interface for the bandwidth figures.
    #[arg(short, long)]
    device: Option<String>,

    /// Number of rows in the process rankings.
    #[arg(short = 'n', long, default_value = "10")]
    top: usize,

    /// Emit the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("hostwatch={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// All derived metrics of one snapshot. Metrics whose derivation failed
/// are logged and omitted.
#[derive(Debug, Default, Serialize)]
struct Report {
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tcp_connections: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    udp_connections: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_used_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    load_average_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bandwidth_rx_kb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bandwidth_tx_kb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_used_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_used_percent: Option<f64>,
    top_cpu: Vec<ProcessSample>,
    top_memory: Vec<ProcessSample>,
}

/// Unwraps a metric, logging and discarding the error.
fn try_metric<T, E: std::error::Error>(name: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{}: {}", name, e);
            None
        }
    }
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn build_report(engine: &UsageEngine<RealSource>, with_device: bool, top: usize) -> Report {
    let timestamp = engine
        .snapshot()
        .map(|s| format_timestamp(s.timestamp))
        .unwrap_or_default();

    let mut report = Report {
        timestamp,
        memory_used: try_metric("memory_used", engine.memory_used()),
        tcp_connections: try_metric("tcp_connections", engine.tcp_connections()),
        udp_connections: try_metric("udp_connections", engine.udp_connections()),
        cpu_used_percent: try_metric("cpu_used_percent", engine.cpu_used_percent()),
        load_average_percent: try_metric("load_average", engine.load_average()),
        disk_used_gb: try_metric("disk_used_gb", engine.disk_used_gb()),
        disk_used_percent: try_metric("disk_used_percentage", engine.disk_used_percentage()),
        top_cpu: try_metric("top_cpu_processes", engine.top_cpu_processes(top))
            .unwrap_or_default(),
        top_memory: try_metric("top_memory_processes", engine.top_memory_processes(top))
            .unwrap_or_default(),
        ..Report::default()
    };

    if with_device {
        report.bandwidth_rx_kb = try_metric("bandwidth_rx", engine.bandwidth_rx());
        report.bandwidth_tx_kb = try_metric("bandwidth_tx", engine.bandwidth_tx());
    }

    report
}

fn print_ranking(title: &str, samples: &[ProcessSample]) {
    if samples.is_empty() {
        return;
    }
    println!("{}:", title);
    for sample in samples {
        println!(
            "  {:<24} cpu {:>6.2}%  mem {:>6.2}%",
            sample.name, sample.cpu_percent, sample.mem_percent
        );
    }
}

fn print_text(report: &Report) {
    println!("hostwatch report ({})", report.timestamp);

    if let Some(v) = report.memory_used {
        println!("  memory used:        {:.2} of total", v);
    }
    if let Some(v) = report.cpu_used_percent {
        println!("  cpu used:           {:.2}% (since boot)", v);
    }
    if let Some(v) = report.load_average_percent {
        println!("  load (1 min):       {:.2}%", v);
    }
    if let Some(v) = report.tcp_connections {
        println!("  tcp connections:    {}", v);
    }
    if let Some(v) = report.udp_connections {
        println!("  udp connections:    {}", v);
    }
    if let Some(v) = report.bandwidth_rx_kb {
        println!("  received:           {:.2} KB", v);
    }
    if let Some(v) = report.bandwidth_tx_kb {
        println!("  transmitted:        {:.2} KB", v);
    }
    if let Some(v) = report.disk_used_gb {
        println!("  disk used:          {:.2} GB", v);
    }
    if let Some(v) = report.disk_used_percent {
        println!("  disk used percent:  {:.2}%", v);
    }

    print_ranking("top processes by cpu", &report.top_cpu);
    print_ranking("top processes by memory", &report.top_memory);
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let mut config = EngineConfig::new().with_proc_path(&args.proc_path);
    if let Some(ref device) = args.device {
        config = config.with_device(device);
    }
    let with_device = config.device.is_some();

    let mut engine = UsageEngine::new(RealSource::new(), config);

    if let Err(e) = engine.refresh() {
        error!("failed to collect snapshot: {}", e);
        std::process::exit(1);
    }

    let report = build_report(&engine, with_device, args.top);

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_text(&report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1700000000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_report_json_omits_failed_metrics() {
        let report = Report {
            timestamp: "2023-11-14 22:13:20 UTC".to_string(),
            memory_used: Some(0.25),
            ..Report::default()
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"memory_used\":0.25"));
        assert!(!json.contains("tcp_connections"));
    }

    #[test]
    fn test_try_metric_discards_errors() {
        let ok: Result<u64, hostwatch::MetricError> = Ok(5);
        let err: Result<u64, hostwatch::MetricError> =
            Err(hostwatch::MetricError::NotRefreshed);

        assert_eq!(try_metric("ok", ok), Some(5));
        assert_eq!(try_metric("err", err), None);
    }
}
