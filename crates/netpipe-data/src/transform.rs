//! Device enrichment and the syslog time-window join.
//!
//! Each valid interface stat picks up its device's inventory attributes and
//! at most one syslog event: the closest-in-time event for the same device
//! within ±window (boundary inclusive). The match is deterministic under a
//! total order – minimum absolute distance, then earliest event timestamp,
//! then earliest input position – so repeated runs on identical input select
//! the same event every time.

use std::collections::HashMap;

use chrono::Duration;
use netpipe_core::models::{DeviceRecord, InterfaceStat, JoinedRecord, LogEvent};
use tracing::warn;

/// Join valid interface stats with device metadata and nearby syslog events.
///
/// `valid_syslog` must be in input order – the position inside the slice is
/// the final tie-break key. Validation guarantees every stat's device exists
/// in `inventory`; a miss here would mean the stages were wired out of order,
/// so the record is skipped with a warning rather than fabricated.
pub fn transform(
    valid_stats: &[InterfaceStat],
    valid_syslog: &[LogEvent],
    inventory: &[DeviceRecord],
    window: Duration,
) -> Vec<JoinedRecord> {
    let devices: HashMap<&str, &DeviceRecord> =
        inventory.iter().map(|d| (d.device.as_str(), d)).collect();

    let mut joined = Vec::with_capacity(valid_stats.len());
    for stat in valid_stats {
        let Some(device) = devices.get(stat.device.as_str()) else {
            warn!(
                "Skipping stat for \"{}\": device missing from inventory after validation",
                stat.device
            );
            continue;
        };

        let matched = closest_event(stat, valid_syslog, window);

        joined.push(JoinedRecord {
            timestamp: stat.timestamp,
            ts: stat.ts.clone(),
            device: stat.device.clone(),
            site: device.site.clone(),
            vendor: device.vendor.clone(),
            role: device.role.clone(),
            if_name: stat.if_name.clone(),
            util_in: stat.util_in,
            util_out: stat.util_out,
            oper_status: stat.oper_status,
            syslog_severity: matched.map(|e| e.severity.clone()),
            syslog_msg: matched.map(|e| e.message.clone()),
        });
    }

    joined
}

/// Select the single best-matching syslog event for a stat, or `None`.
///
/// Candidates are same-device events with `|event.ts - stat.ts| <= window`.
/// Ranking: smallest distance first; equal distances prefer the earlier
/// event timestamp; identical timestamps prefer the earlier input position
/// (which the in-order scan gives for free, by never replacing on ties).
fn closest_event<'a>(
    stat: &InterfaceStat,
    events: &'a [LogEvent],
    window: Duration,
) -> Option<&'a LogEvent> {
    let mut best: Option<&LogEvent> = None;

    for event in events.iter().filter(|e| e.device == stat.device) {
        let distance = (event.timestamp - stat.timestamp).abs();
        if distance > window {
            continue;
        }

        best = match best {
            None => Some(event),
            Some(current) => {
                let current_distance = (current.timestamp - stat.timestamp).abs();
                if distance < current_distance
                    || (distance == current_distance && event.timestamp < current.timestamp)
                {
                    Some(event)
                } else {
                    Some(current)
                }
            }
        };
    }

    best
}

// ── Tests ─────────────────────────────────────────────────────────────────────
