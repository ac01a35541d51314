use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;

use crate::timestamp::TimestampPolicy;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Batch ETL pipeline for network-management data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "netpipe",
    about = "Batch ETL pipeline for network-management data",
    version
)]
pub struct Settings {
    /// Directory where the output tables are written
    #[arg(long, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Device inventory CSV (columns: device,site,vendor,role)
    #[arg(long, default_value = "data/device_inventory.csv")]
    pub device_inventory_path: PathBuf,

    /// Interface stats CSV (columns: ts,device,ifName,util_in,util_out,admin_status,oper_status)
    #[arg(long, default_value = "data/interface_stats.csv")]
    pub interface_stats_path: PathBuf,

    /// Syslog source, line-delimited JSON (fields: ts,device,severity,message)
    #[arg(long, default_value = "data/syslog.jsonl")]
    pub syslog_path: PathBuf,

    /// Syslog join window in seconds (a stat matches events within ±window)
    #[arg(long, default_value = "300", value_parser = clap::value_parser!(u32).range(1..))]
    pub window_secs: u32,

    /// Treat zone-less timestamps as UTC instead of quarantining them
    #[arg(long)]
    pub assume_utc: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,
}

impl Settings {
    /// Convert the CLI surface into the config the pipeline stages consume.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            join_window: Duration::seconds(i64::from(self.window_secs)),
            timestamp_policy: if self.assume_utc {
                TimestampPolicy::AssumeUtc
            } else {
                TimestampPolicy::RequireOffset
            },
        }
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────────────────

/// Run configuration consumed by the pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Half-width of the syslog join window; events within ±window match,
    /// boundary inclusive.
    pub join_window: Duration,
    /// Validation strictness for input timestamps.
    pub timestamp_policy: TimestampPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            join_window: Duration::minutes(5),
            timestamp_policy: TimestampPolicy::RequireOffset,
        }
    }
}
