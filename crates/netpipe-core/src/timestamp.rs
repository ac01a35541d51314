use chrono::{DateTime, TimeZone, Utc};

// ── Timestamp policy ──────────────────────────────────────────────────────────

/// How strictly input timestamps are validated.
///
/// Every timestamp in the pipeline is normalised to a single canonical
/// `DateTime<Utc>`; the policy only governs what happens to *naive* (zone-less)
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Reject timestamps that carry no UTC offset or `Z` suffix.
    #[default]
    RequireOffset,
    /// Interpret zone-less timestamps as UTC.
    AssumeUtc,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Naive date-time patterns accepted under [`TimestampPolicy::AssumeUtc`].
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse an ISO 8601 / RFC 3339 timestamp string into a UTC [`DateTime`].
///
/// Handles the common `Z`-suffix form and any fixed UTC offset. Under
/// [`TimestampPolicy::AssumeUtc`] a zone-less date-time is additionally
/// accepted and interpreted as UTC. Returns `None` for empty strings and
/// anything else – callers decide whether that is fatal or a quality failure.
pub fn parse_utc(s: &str, policy: TimestampPolicy) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
    let normalised = if let Some(stripped) = s.strip_suffix('Z') {
        format!("{}+00:00", stripped)
    } else {
        s.to_string()
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.with_timezone(&Utc));
    }

    if policy == TimestampPolicy::AssumeUtc {
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }
    }

    None
}
