//! Structural parsing of the three input sources.
//!
//! This stage does no business validation: it reads CSV and JSONL sources
//! into raw in-memory rows, attempting type coercion for numeric fields and
//! recording an explicit "unparsable" marker (`None`) instead of failing.
//! Structural problems – an unreadable file, a missing header column, a row
//! with the wrong column count, a malformed JSON line – are fatal and abort
//! the run with an error naming the source and line.

use std::fs::File;
use std::io::BufRead;
use std::path::Path;

use netpipe_core::error::{PipelineError, Result};
use netpipe_core::models::{DeviceRecord, InterfaceStatRow, LogEventRow};
use tracing::debug;

// ── Device inventory ──────────────────────────────────────────────────────────

/// Load the device inventory CSV (columns `device,site,vendor,role`).
pub fn load_device_inventory(path: &Path) -> Result<Vec<DeviceRecord>> {
    let mut rdr = open_csv(path)?;
    let headers = read_headers(&mut rdr, path)?;
    let cols = Columns::resolve(&headers, path, &["device", "site", "vendor", "role"])?;

    let mut records = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = csv_row(row, path, i)?;
        records.push(DeviceRecord {
            device: cols.field(&row, path, i, 0)?.to_string(),
            site: cols.field(&row, path, i, 1)?.to_string(),
            vendor: cols.field(&row, path, i, 2)?.to_string(),
            role: cols.field(&row, path, i, 3)?.to_string(),
        });
    }

    debug!("Loaded {} inventory rows from {}", records.len(), path.display());
    Ok(records)
}

// ── Interface stats ───────────────────────────────────────────────────────────

/// Load the interface stats CSV
/// (columns `ts,device,ifName,util_in,util_out,admin_status,oper_status`).
///
/// Numeric fields that fail to parse become `None`; the quality stage turns
/// those into quarantine reasons.
pub fn load_interface_stats(path: &Path) -> Result<Vec<InterfaceStatRow>> {
    let mut rdr = open_csv(path)?;
    let headers = read_headers(&mut rdr, path)?;
    let cols = Columns::resolve(
        &headers,
        path,
        &[
            "ts",
            "device",
            "ifName",
            "util_in",
            "util_out",
            "admin_status",
            "oper_status",
        ],
    )?;

    let mut rows = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let row = csv_row(row, path, i)?;
        rows.push(InterfaceStatRow {
            ts: cols.field(&row, path, i, 0)?.to_string(),
            device: cols.field(&row, path, i, 1)?.to_string(),
            if_name: cols.field(&row, path, i, 2)?.to_string(),
            util_in: coerce_f64(cols.field(&row, path, i, 3)?),
            util_out: coerce_f64(cols.field(&row, path, i, 4)?),
            admin_status: coerce_i64(cols.field(&row, path, i, 5)?),
            oper_status: coerce_i64(cols.field(&row, path, i, 6)?),
            raw: row.iter().collect::<Vec<_>>().join(","),
        });
    }

    debug!(
        "Loaded {} interface-stat rows from {}",
        rows.len(),
        path.display()
    );
    Ok(rows)
}

// ── Syslog ────────────────────────────────────────────────────────────────────

/// Load the syslog JSONL source (fields `ts,device,severity,message`).
///
/// Blank lines are skipped; a line that is not a JSON object with all four
/// string fields is fatal.
pub fn load_syslog(path: &Path) -> Result<Vec<LogEventRow>> {
    let file = File::open(path).map_err(|e| PipelineError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut rows = Vec::new();
    for (i, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line_no = i + 1;
        let line = line.map_err(|e| PipelineError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: serde_json::Value =
            serde_json::from_str(trimmed).map_err(|e| PipelineError::JsonLine {
                path: path.to_path_buf(),
                line: line_no,
                source: e,
            })?;

        rows.push(LogEventRow {
            ts: json_str(&value, path, line_no, "ts")?,
            device: json_str(&value, path, line_no, "device")?,
            severity: json_str(&value, path, line_no, "severity")?,
            message: json_str(&value, path, line_no, "message")?,
            raw: trimmed.to_string(),
        });
    }

    debug!("Loaded {} syslog rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| PipelineError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn read_headers(rdr: &mut csv::Reader<File>, path: &Path) -> Result<csv::StringRecord> {
    rdr.headers()
        .map(|h| h.clone())
        .map_err(|e| PipelineError::CsvRow {
            path: path.to_path_buf(),
            row: 1,
            message: e.to_string(),
        })
}

/// Resolved header positions for a fixed set of required columns.
struct Columns(Vec<usize>);

impl Columns {
    /// Locate every required column in `headers`, failing on the first that
    /// is absent.
    fn resolve(headers: &csv::StringRecord, path: &Path, names: &[&str]) -> Result<Self> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = headers.iter().position(|h| h == *name).ok_or_else(|| {
                PipelineError::MissingColumn {
                    path: path.to_path_buf(),
                    column: (*name).to_string(),
                }
            })?;
            indices.push(idx);
        }
        Ok(Self(indices))
    }

    /// Fetch the `slot`-th resolved column from a data row.
    ///
    /// `data_idx` is the 0-based data-row index; errors report the 1-based
    /// file row (header = row 1).
    fn field<'r>(
        &self,
        row: &'r csv::StringRecord,
        path: &Path,
        data_idx: usize,
        slot: usize,
    ) -> Result<&'r str> {
        row.get(self.0[slot]).ok_or_else(|| PipelineError::CsvRow {
            path: path.to_path_buf(),
            row: data_idx + 2,
            message: format!("row has fewer fields than the header ({})", row.len()),
        })
    }
}

/// Wrap a `csv` crate row error with the file row it occurred on.
fn csv_row(
    row: std::result::Result<csv::StringRecord, csv::Error>,
    path: &Path,
    data_idx: usize,
) -> Result<csv::StringRecord> {
    row.map_err(|e| PipelineError::CsvRow {
        path: path.to_path_buf(),
        row: data_idx + 2,
        message: e.to_string(),
    })
}

/// Coercion attempt: empty or non-numeric text maps to `None`.
fn coerce_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

fn coerce_i64(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok()
}

/// Extract a required string field from a JSONL object.
fn json_str(value: &serde_json::Value, path: &Path, line: usize, field: &str) -> Result<String> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| PipelineError::MissingField {
            path: path.to_path_buf(),
            line,
            field: field.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).expect("create file");
        f.write_all(content.as_bytes()).expect("write file");
        path
    }

    // ── Device inventory ──────────────────────────────────────────────────────

    #[test]
    fn test_load_device_inventory() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_file(
            &tmp,
            "inv.csv",
            "device,site,vendor,role\n\
             core-sw-01,fra1,cisco,core\n\
             edge-rt-02,ams2,juniper,edge\n",
        );

        let records = load_device_inventory(&path).expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].device, "core-sw-01");
        assert_eq!(records[1].vendor, "juniper");
    }

    #[test]
    fn test_inventory_missing_column_is_fatal() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_file(&tmp, "inv.csv", "device,site,role\na,b,c\n");

        let err = load_device_inventory(&path).expect_err("missing column");
        let msg = err.to_string();
        assert!(msg.contains("vendor"), "got: {msg}");
        assert!(msg.contains("inv.csv"));
    }

    #[test]
    fn test_missing_file_is_fatal_and_names_path() {
        let err =
            load_device_inventory(Path::new("/no/such/inventory.csv")).expect_err("missing file");
        assert!(err.to_string().contains("/no/such/inventory.csv"));
    }

    // ── Interface stats ───────────────────────────────────────────────────────

    const STATS_HEADER: &str = "ts,device,ifName,util_in,util_out,admin_status,oper_status";

    #[test]
    fn test_load_interface_stats_coerces_numerics() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_file(
            &tmp,
            "stats.csv",
            &format!(
                "{STATS_HEADER}\n\
                 2024-03-01T10:00:00Z,core-sw-01,Gi0/1,42.5,17.0,1,1\n\
                 2024-03-01T10:05:00Z,core-sw-01,Gi0/2,abc,,1,down\n"
            ),
        );

        let rows = load_interface_stats(&path).expect("load");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].util_in, Some(42.5));
        assert_eq!(rows[0].oper_status, Some(1));

        // Unparsable numerics become None markers, not errors.
        assert_eq!(rows[1].util_in, None);
        assert_eq!(rows[1].util_out, None);
        assert_eq!(rows[1].oper_status, None);
        assert!(rows[1].raw.contains("abc"));
    }

    #[test]
    fn test_interface_stats_wrong_column_count_is_fatal() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_file(
            &tmp,
            "stats.csv",
            &format!("{STATS_HEADER}\n2024-03-01T10:00:00Z,core-sw-01,Gi0/1\n"),
        );

        let err = load_interface_stats(&path).expect_err("short row");
        let msg = err.to_string();
        assert!(msg.contains("row 2"), "got: {msg}");
        assert!(msg.contains("stats.csv"));
    }

    #[test]
    fn test_interface_stats_column_order_independent() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_file(
            &tmp,
            "stats.csv",
            "device,ts,oper_status,admin_status,util_out,util_in,ifName\n\
             core-sw-01,2024-03-01T10:00:00Z,2,1,9.5,3.25,Gi0/3\n",
        );

        let rows = load_interface_stats(&path).expect("load");
        assert_eq!(rows[0].device, "core-sw-01");
        assert_eq!(rows[0].if_name, "Gi0/3");
        assert_eq!(rows[0].util_in, Some(3.25));
        assert_eq!(rows[0].util_out, Some(9.5));
        assert_eq!(rows[0].oper_status, Some(2));
    }

    // ── Syslog ────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_syslog_skips_blank_lines() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_file(
            &tmp,
            "syslog.jsonl",
            "{\"ts\":\"2024-03-01T10:00:00Z\",\"device\":\"core-sw-01\",\"severity\":\"ERROR\",\"message\":\"link down\"}\n\
             \n\
             {\"ts\":\"2024-03-01T10:02:00Z\",\"device\":\"edge-rt-02\",\"severity\":\"INFO\",\"message\":\"config saved\"}\n",
        );

        let rows = load_syslog(&path).expect("load");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].severity, "ERROR");
        assert_eq!(rows[1].device, "edge-rt-02");
    }

    #[test]
    fn test_syslog_malformed_line_is_fatal_and_names_line() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_file(
            &tmp,
            "syslog.jsonl",
            "{\"ts\":\"2024-03-01T10:00:00Z\",\"device\":\"a\",\"severity\":\"INFO\",\"message\":\"ok\"}\n\
             {not json}\n",
        );

        let err = load_syslog(&path).expect_err("malformed line");
        let msg = err.to_string();
        assert!(msg.contains("line 2"), "got: {msg}");
        assert!(msg.contains("syslog.jsonl"));
    }

    #[test]
    fn test_syslog_missing_field_is_fatal() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write_file(
            &tmp,
            "syslog.jsonl",
            "{\"ts\":\"2024-03-01T10:00:00Z\",\"device\":\"a\",\"message\":\"no severity\"}\n",
        );

        let err = load_syslog(&path).expect_err("missing field");
        let msg = err.to_string();
        assert!(msg.contains("\"severity\""), "got: {msg}");
        assert!(msg.contains("line 1"));
    }
}
