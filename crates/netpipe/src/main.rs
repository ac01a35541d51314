mod bootstrap;

use anyhow::{Context, Result};
use clap::Parser;
use netpipe_core::settings::Settings;
use netpipe_data::analytics::generate_analytics;
use netpipe_data::quality::perform_quality_control;
use netpipe_data::reader::{load_device_inventory, load_interface_stats, load_syslog};
use netpipe_data::report::write_outputs;
use netpipe_data::transform::transform;
use tracing::info;

/// Invalid-record reasons shown in the run summary before the rest go to CSV.
const SAMPLE_REASONS: usize = 3;

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    info!("netpipe v{} starting", env!("CARGO_PKG_VERSION"));
    let config = settings.pipeline_config();

    // Step 1: ingest. Any structural failure here is fatal and nothing gets
    // written – a partial-input run would silently produce misleading tables.
    info!("Step 1: ingesting data");
    let inventory = load_device_inventory(&settings.device_inventory_path)
        .context("ingesting device inventory")?;
    let stats = load_interface_stats(&settings.interface_stats_path)
        .context("ingesting interface stats")?;
    let syslog = load_syslog(&settings.syslog_path).context("ingesting syslog")?;
    info!(
        "  device inventory: {} records, interface stats: {} records, syslog: {} records",
        inventory.len(),
        stats.len(),
        syslog.len()
    );

    // Step 2: quality control.
    info!("Step 2: performing data quality checks");
    let outcome = perform_quality_control(&stats, &syslog, &inventory, config.timestamp_policy);
    info!(
        "  valid interface stats: {}, valid syslog: {}, quarantined: {}",
        outcome.valid_stats.len(),
        outcome.valid_syslog.len(),
        outcome.invalid.len()
    );
    for record in outcome.invalid.iter().take(SAMPLE_REASONS) {
        info!(
            "  quarantined {} row {}: {}",
            record.source,
            record.row,
            record.reasons.join("; ")
        );
    }

    // Step 3: transform (device enrichment + time-window join).
    info!(
        "Step 3: transforming data (join window ±{}s)",
        config.join_window.num_seconds()
    );
    let joined = transform(
        &outcome.valid_stats,
        &outcome.valid_syslog,
        &inventory,
        config.join_window,
    );
    info!("  transformed records: {}", joined.len());

    // Step 4: analytics.
    info!("Step 4: generating analytics");
    let summary = generate_analytics(&joined);
    info!("  device summaries: {}", summary.len());

    // All stages succeeded; only now touch the output directory.
    let written = write_outputs(&settings.output_dir, &joined, &summary, &outcome.invalid)
        .context("writing output tables")?;

    info!("Pipeline completed successfully. Output files:");
    for path in &written {
        info!("  {}", path.display());
    }

    Ok(())
}
