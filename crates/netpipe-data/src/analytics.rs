//! Per-device summary statistics over the joined records.
//!
//! Per-record utilization is the mean of `util_in` and `util_out`; the summary
//! averages and maxes that single series per device. `error_count` counts only
//! joined records whose matched syslog severity is exactly `"ERROR"`
//! (case-sensitive) – unmatched records never contribute.

use std::collections::BTreeMap;

use netpipe_core::models::{DeviceSummary, JoinedRecord};

/// The matched-severity label that counts towards `error_count`.
const ERROR_SEVERITY: &str = "ERROR";

// ── Accumulator ───────────────────────────────────────────────────────────────

/// Running utilization and error totals for one device.
#[derive(Debug, Clone, Default)]
struct DeviceStats {
    utilization_sum: f64,
    utilization_max: f64,
    records: u64,
    errors: u64,
}

impl DeviceStats {
    /// Fold one joined record into the running totals.
    fn add_record(&mut self, record: &JoinedRecord) {
        let utilization = (record.util_in + record.util_out) / 2.0;
        self.utilization_sum += utilization;
        self.utilization_max = self.utilization_max.max(utilization);
        self.records += 1;
        if record.syslog_severity.as_deref() == Some(ERROR_SEVERITY) {
            self.errors += 1;
        }
    }
}

// ── Analytics ─────────────────────────────────────────────────────────────────

/// Group joined records by device and compute the summary table.
///
/// Devices with zero joined records are excluded – no fabricated zero rows.
/// Output is sorted ascending by device id and utilization values are rounded
/// to 2 decimals, so repeated runs on identical input are byte-identical.
pub fn generate_analytics(joined: &[JoinedRecord]) -> Vec<DeviceSummary> {
    // BTreeMap keeps the per-device output sorted by key.
    let mut map: BTreeMap<&str, DeviceStats> = BTreeMap::new();
    for record in joined {
        map.entry(record.device.as_str())
            .or_default()
            .add_record(record);
    }

    map.into_iter()
        .map(|(device, stats)| DeviceSummary {
            device: device.to_string(),
            avg_utilization: round2(stats.utilization_sum / stats.records as f64),
            max_utilization: round2(stats.utilization_max),
            error_count: stats.errors,
        })
        .collect()
}

/// Round to 2 decimal places, matching the output table's precision.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────
