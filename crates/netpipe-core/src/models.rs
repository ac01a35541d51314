use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

// ── Inventory ─────────────────────────────────────────────────────────────────

/// One row of the device inventory. `device` is the unique key; the inventory
/// is loaded once at the start of a run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Device identifier, e.g. `"core-sw-01"`.
    pub device: String,
    /// Site / location the device is installed at.
    pub site: String,
    /// Hardware vendor.
    pub vendor: String,
    /// Network role, e.g. `"core"`, `"access"`.
    pub role: String,
}

// ── Raw rows (post structural parse, pre validation) ──────────────────────────

/// An interface-stats row as read from the CSV source.
///
/// Numeric fields are coercion *attempts*: `None` marks a value that did not
/// parse (the quality stage turns that into a quarantine reason, never a
/// panic or a structural error). `ts` stays a string until validation; `raw`
/// preserves the original field values for the invalid-records report.
#[derive(Debug, Clone)]
pub struct InterfaceStatRow {
    pub ts: String,
    pub device: String,
    pub if_name: String,
    pub util_in: Option<f64>,
    pub util_out: Option<f64>,
    pub admin_status: Option<i64>,
    pub oper_status: Option<i64>,
    /// The original comma-joined field values, kept for quarantine reporting.
    pub raw: String,
}

/// A syslog event as read from the JSONL source, prior to validation.
#[derive(Debug, Clone)]
pub struct LogEventRow {
    pub ts: String,
    pub device: String,
    pub severity: String,
    pub message: String,
    /// The original JSON line, kept for quarantine reporting.
    pub raw: String,
}

// ── Validated records ─────────────────────────────────────────────────────────

/// An interface-stats record that passed every quality rule.
///
/// All fields are known-good here: `timestamp` parsed as UTC, both
/// utilizations are within `[0, 100]` and `oper_status` is 1 or 2.
#[derive(Debug, Clone)]
pub struct InterfaceStat {
    /// Canonical UTC instant parsed from `ts`.
    pub timestamp: DateTime<Utc>,
    /// The original timestamp string, preserved verbatim for output.
    pub ts: String,
    pub device: String,
    pub if_name: String,
    pub util_in: f64,
    pub util_out: f64,
    pub admin_status: Option<i64>,
    pub oper_status: i64,
}

/// A syslog event that passed validation (known device, parsable timestamp).
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Canonical UTC instant parsed from the event's `ts` field.
    pub timestamp: DateTime<Utc>,
    pub device: String,
    /// Severity label as found in the source, e.g. `ERROR` / `WARN` / `INFO`.
    pub severity: String,
    pub message: String,
}

// ── Quarantine ────────────────────────────────────────────────────────────────

/// Which input source a quarantined record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    InterfaceStats,
    Syslog,
}

impl fmt::Display for RecordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordSource::InterfaceStats => write!(f, "interface_stats"),
            RecordSource::Syslog => write!(f, "syslog"),
        }
    }
}

/// A record that failed one or more quality rules, with every failing reason.
///
/// `reasons` is always non-empty; `row` is the record's 0-based position in
/// its source sequence so that reports are diffable across runs.
#[derive(Debug, Clone)]
pub struct InvalidRecord {
    pub source: RecordSource,
    pub row: usize,
    /// Rendering of the original record's fields.
    pub record: String,
    pub reasons: Vec<String>,
}

// ── Joined output ─────────────────────────────────────────────────────────────

/// One row of the denormalized `transformed_data` table: a valid interface
/// stat enriched with device attributes and (optionally) the closest syslog
/// event within the join window.
#[derive(Debug, Clone, Serialize)]
pub struct JoinedRecord {
    /// Parsed instant used for aggregation; not part of the output schema.
    #[serde(skip_serializing)]
    pub timestamp: DateTime<Utc>,
    pub ts: String,
    pub device: String,
    pub site: String,
    pub vendor: String,
    pub role: String,
    #[serde(rename = "ifName")]
    pub if_name: String,
    pub util_in: f64,
    pub util_out: f64,
    pub oper_status: i64,
    /// Severity of the matched syslog event, `None` when nothing matched.
    pub syslog_severity: Option<String>,
    /// Message of the matched syslog event, `None` when nothing matched.
    pub syslog_msg: Option<String>,
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// Per-device summary statistics over the joined records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSummary {
    pub device: String,
    /// Mean of per-record utilization `(util_in + util_out) / 2`, 2 decimals.
    pub avg_utilization: f64,
    /// Maximum per-record utilization, 2 decimals.
    pub max_utilization: f64,
    /// Number of joined records whose matched severity is exactly `ERROR`.
    pub error_count: u64,
}
