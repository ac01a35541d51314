//! Quality control: partition raw rows into valid records and quarantined
//! invalid records.
//!
//! Every rule is evaluated independently so a quarantined record carries ALL
//! of its failing reasons, not just the first. The stage is pure and
//! order-preserving – output order matches input order for all three
//! sequences – so invalid-record reports are reproducible and diffable.

use std::collections::HashSet;

use netpipe_core::models::{
    DeviceRecord, InterfaceStat, InterfaceStatRow, InvalidRecord, LogEvent, LogEventRow,
    RecordSource,
};
use netpipe_core::timestamp::{parse_utc, TimestampPolicy};

// ── Outcome ───────────────────────────────────────────────────────────────────

/// The validator's two disjoint outputs plus the quarantine side channel.
#[derive(Debug, Default)]
pub struct QualityOutcome {
    /// Interface stats that passed every rule, in input order.
    pub valid_stats: Vec<InterfaceStat>,
    /// Syslog events that passed validation, in input order.
    pub valid_syslog: Vec<LogEvent>,
    /// Everything that failed, with all accumulated reasons, in input order
    /// (interface stats first, then syslog).
    pub invalid: Vec<InvalidRecord>,
}

// ── Quality control ───────────────────────────────────────────────────────────

/// Run all quality rules over the raw interface-stat and syslog rows.
///
/// Interface-stat rules:
/// 1. `device` must be a key in the device inventory;
/// 2. `ts` must parse as an ISO-8601 UTC timestamp (per `policy`);
/// 3. `util_in` and `util_out` must both be numeric and within `[0, 100]`;
/// 4. `oper_status` must be exactly 1 or 2.
///
/// Syslog rules: known device and parsable timestamp. Only valid syslog
/// events go on to participate in the time-window join.
pub fn perform_quality_control(
    stats: &[InterfaceStatRow],
    syslog: &[LogEventRow],
    inventory: &[DeviceRecord],
    policy: TimestampPolicy,
) -> QualityOutcome {
    let known: HashSet<&str> = inventory.iter().map(|d| d.device.as_str()).collect();
    let mut outcome = QualityOutcome::default();

    for (idx, row) in stats.iter().enumerate() {
        let mut reasons = Vec::new();

        if !known.contains(row.device.as_str()) {
            reasons.push(format!("unknown device \"{}\"", row.device));
        }

        let timestamp = parse_utc(&row.ts, policy);
        if timestamp.is_none() {
            reasons.push(format!(
                "timestamp \"{}\" is not ISO-8601 UTC",
                row.ts
            ));
        }

        let util_in = check_utilization(row.util_in, "util_in", &mut reasons);
        let util_out = check_utilization(row.util_out, "util_out", &mut reasons);

        let oper_status = match row.oper_status {
            Some(v @ (1 | 2)) => Some(v),
            _ => {
                reasons.push("oper_status must be 1 or 2".to_string());
                None
            }
        };

        match (timestamp, util_in, util_out, oper_status) {
            (Some(timestamp), Some(util_in), Some(util_out), Some(oper_status))
                if reasons.is_empty() =>
            {
                outcome.valid_stats.push(InterfaceStat {
                    timestamp,
                    ts: row.ts.clone(),
                    device: row.device.clone(),
                    if_name: row.if_name.clone(),
                    util_in,
                    util_out,
                    admin_status: row.admin_status,
                    oper_status,
                });
            }
            _ => outcome.invalid.push(InvalidRecord {
                source: RecordSource::InterfaceStats,
                row: idx,
                record: row.raw.clone(),
                reasons,
            }),
        }
    }

    for (idx, row) in syslog.iter().enumerate() {
        let mut reasons = Vec::new();

        if !known.contains(row.device.as_str()) {
            reasons.push(format!("unknown device \"{}\"", row.device));
        }

        let timestamp = parse_utc(&row.ts, policy);
        if timestamp.is_none() {
            reasons.push(format!(
                "timestamp \"{}\" is not ISO-8601 UTC",
                row.ts
            ));
        }

        match timestamp {
            Some(timestamp) if reasons.is_empty() => outcome.valid_syslog.push(LogEvent {
                timestamp,
                device: row.device.clone(),
                severity: row.severity.clone(),
                message: row.message.clone(),
            }),
            _ => outcome.invalid.push(InvalidRecord {
                source: RecordSource::Syslog,
                row: idx,
                record: row.raw.clone(),
                reasons,
            }),
        }
    }

    outcome
}

/// Check one utilization field: must be present, numeric and within [0, 100].
fn check_utilization(value: Option<f64>, field: &str, reasons: &mut Vec<String>) -> Option<f64> {
    match value {
        None => {
            reasons.push(format!("{field} is missing or not numeric"));
            None
        }
        Some(v) if !(0.0..=100.0).contains(&v) => {
            reasons.push(format!("{field} out of range [0, 100]"));
            None
        }
        Some(v) => Some(v),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
