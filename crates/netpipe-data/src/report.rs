//! Output tables.
//!
//! Writes the three CSV outputs with fixed schemas. Nothing here is called
//! until every pipeline stage has finished, which keeps runs all-or-nothing:
//! a fatal ingest or quality-control error means no partial tables on disk.

use std::path::{Path, PathBuf};

use netpipe_core::error::{PipelineError, Result};
use netpipe_core::models::{DeviceSummary, InvalidRecord, JoinedRecord};
use serde::Serialize;
use tracing::info;

/// Output table file names.
pub const TRANSFORMED_DATA_FILE: &str = "transformed_data.csv";
pub const DEVICE_SUMMARY_FILE: &str = "device_summary.csv";
pub const INVALID_RECORDS_FILE: &str = "invalid_records.csv";

const TRANSFORMED_HEADER: &[&str] = &[
    "ts",
    "device",
    "site",
    "vendor",
    "role",
    "ifName",
    "util_in",
    "util_out",
    "oper_status",
    "syslog_severity",
    "syslog_msg",
];
const SUMMARY_HEADER: &[&str] = &["device", "avg_utilization", "max_utilization", "error_count"];
const INVALID_HEADER: &[&str] = &["source", "row", "record", "reasons"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Write all output tables under `output_dir`, creating it if needed.
///
/// `invalid_records.csv` is only written when there is at least one
/// quarantined record; a clean run leaves no empty file behind. Returns the
/// paths that were written.
pub fn write_outputs(
    output_dir: &Path,
    joined: &[JoinedRecord],
    summary: &[DeviceSummary],
    invalid: &[InvalidRecord],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();

    let transformed_path = output_dir.join(TRANSFORMED_DATA_FILE);
    write_table(&transformed_path, TRANSFORMED_HEADER, joined)?;
    written.push(transformed_path);

    let summary_path = output_dir.join(DEVICE_SUMMARY_FILE);
    write_table(&summary_path, SUMMARY_HEADER, summary)?;
    written.push(summary_path);

    if !invalid.is_empty() {
        let rows: Vec<InvalidRow> = invalid.iter().map(InvalidRow::from).collect();
        let invalid_path = output_dir.join(INVALID_RECORDS_FILE);
        write_table(&invalid_path, INVALID_HEADER, &rows)?;
        info!(
            "Quarantined {} records to {}",
            invalid.len(),
            invalid_path.display()
        );
        written.push(invalid_path);
    }

    Ok(written)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Flat serialization of an [`InvalidRecord`] for the quarantine table.
#[derive(Serialize)]
struct InvalidRow {
    source: String,
    row: usize,
    record: String,
    reasons: String,
}

impl From<&InvalidRecord> for InvalidRow {
    fn from(rec: &InvalidRecord) -> Self {
        Self {
            source: rec.source.to_string(),
            row: rec.row,
            record: rec.record.clone(),
            reasons: rec.reasons.join("; "),
        }
    }
}

/// Write one CSV table with an explicit header row.
///
/// The header is written manually so that an empty table still carries its
/// schema; the serializer is told not to emit its own.
fn write_table<S: Serialize>(path: &Path, header: &[&str], rows: &[S]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| write_err(path, &e))?;

    wtr.write_record(header).map_err(|e| write_err(path, &e))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| write_err(path, &e))?;
    }
    wtr.flush().map_err(|e| PipelineError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(())
}

fn write_err(path: &Path, e: &csv::Error) -> PipelineError {
    PipelineError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use netpipe_core::models::RecordSource;
    use tempfile::TempDir;

    fn joined_record(device: &str, severity: Option<&str>) -> JoinedRecord {
        JoinedRecord {
            timestamp: Utc::now(),
            ts: "2024-03-01T10:00:00Z".to_string(),
            device: device.to_string(),
            site: "fra1".to_string(),
            vendor: "cisco".to_string(),
            role: "core".to_string(),
            if_name: "Gi0/1".to_string(),
            util_in: 42.5,
            util_out: 17.0,
            oper_status: 1,
            syslog_severity: severity.map(|s| s.to_string()),
            syslog_msg: severity.map(|_| "link down".to_string()),
        }
    }

    fn summary_row() -> DeviceSummary {
        DeviceSummary {
            device: "core-sw-01".to_string(),
            avg_utilization: 29.75,
            max_utilization: 42.5,
            error_count: 1,
        }
    }

    #[test]
    fn test_write_outputs_schemas() {
        let tmp = TempDir::new().expect("tempdir");
        let joined = vec![joined_record("core-sw-01", Some("ERROR"))];
        let written = write_outputs(tmp.path(), &joined, &[summary_row()], &[]).expect("write");
        assert_eq!(written.len(), 2);

        let transformed =
            std::fs::read_to_string(tmp.path().join(TRANSFORMED_DATA_FILE)).expect("read");
        let mut lines = transformed.lines();
        assert_eq!(
            lines.next(),
            Some(
                "ts,device,site,vendor,role,ifName,util_in,util_out,oper_status,\
                 syslog_severity,syslog_msg"
            )
        );
        let data = lines.next().expect("one data row");
        assert!(data.starts_with("2024-03-01T10:00:00Z,core-sw-01,fra1,cisco,core,Gi0/1,"));
        assert!(data.contains("ERROR"));

        let summary =
            std::fs::read_to_string(tmp.path().join(DEVICE_SUMMARY_FILE)).expect("read");
        assert_eq!(
            summary.lines().next(),
            Some("device,avg_utilization,max_utilization,error_count")
        );
        assert!(summary.lines().nth(1).expect("row").contains("29.75"));
    }

    #[test]
    fn test_absent_match_serializes_empty_fields() {
        let tmp = TempDir::new().expect("tempdir");
        let joined = vec![joined_record("core-sw-01", None)];
        write_outputs(tmp.path(), &joined, &[], &[]).expect("write");

        let transformed =
            std::fs::read_to_string(tmp.path().join(TRANSFORMED_DATA_FILE)).expect("read");
        let data = transformed.lines().nth(1).expect("row");
        assert!(data.ends_with(",,"), "got: {data}");
    }

    #[test]
    fn test_invalid_records_file_omitted_when_clean() {
        let tmp = TempDir::new().expect("tempdir");
        write_outputs(tmp.path(), &[], &[], &[]).expect("write");
        assert!(!tmp.path().join(INVALID_RECORDS_FILE).exists());

        // Empty tables still carry their header row.
        let transformed =
            std::fs::read_to_string(tmp.path().join(TRANSFORMED_DATA_FILE)).expect("read");
        assert_eq!(transformed.lines().count(), 1);
    }

    #[test]
    fn test_invalid_records_written_with_joined_reasons() {
        let tmp = TempDir::new().expect("tempdir");
        let invalid = vec![InvalidRecord {
            source: RecordSource::InterfaceStats,
            row: 3,
            record: "bad-ts,ghost-sw,Gi0/9,250,5,1,7".to_string(),
            reasons: vec![
                "unknown device \"ghost-sw\"".to_string(),
                "util_in out of range [0, 100]".to_string(),
            ],
        }];
        let written = write_outputs(tmp.path(), &[], &[], &invalid).expect("write");
        assert_eq!(written.len(), 3);

        let content =
            std::fs::read_to_string(tmp.path().join(INVALID_RECORDS_FILE)).expect("read");
        assert_eq!(content.lines().next(), Some("source,row,record,reasons"));
        let data = content.lines().nth(1).expect("row");
        assert!(data.starts_with("interface_stats,3,"));
        assert!(data.contains("unknown device \"\"ghost-sw\"\"; util_in out of range"));
    }

    #[test]
    fn test_output_dir_created() {
        let tmp = TempDir::new().expect("tempdir");
        let nested = tmp.path().join("out").join("run1");
        write_outputs(&nested, &[], &[], &[]).expect("write");
        assert!(nested.join(DEVICE_SUMMARY_FILE).exists());
    }
}
