//! Output formatting and persistence for decoded feeds.
//!
//! Supports pretty-printing, JSON serialization, CSV append, and a
//! plain-text report.

use anyhow::Result;
use tracing::{debug, info};

use crate::feed::{EntityRecord, Feed};
use crate::stats::FeedSummary;
use chrono::DateTime;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a decoded feed using Rust's debug pretty-print format.
pub fn print_pretty(feed: &Feed) {
    debug!("{:#?}", feed);
}

/// Logs a decoded feed as pretty-printed JSON.
pub fn print_json(feed: &Feed) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(feed)?);
    Ok(())
}

/// Writes the whole feed as pretty-printed JSON to `path`.
pub fn write_json(path: &str, feed: &Feed) -> Result<()> {
    debug!(path, entities = feed.entities.len(), "Writing JSON export");
    std::fs::write(path, serde_json::to_string_pretty(feed)?)?;
    Ok(())
}

/// Appends one row per entity to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, records: &[EntityRecord]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Renders a human-readable report: header line, summary counts, then one
/// line per entity in feed order.
pub fn render_report(feed: &Feed) -> String {
    let summary = FeedSummary::from_feed(feed);
    let timestamp = DateTime::from_timestamp(feed.header.timestamp as i64, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| feed.header.timestamp.to_string());

    let mut out = String::new();
    out.push_str("GTFS-RT feed report\n");
    out.push_str(&format!(
        "Version {}, generated {}\n",
        feed.header.version, timestamp
    ));
    out.push_str(&format!(
        "Entities: {} total ({} vehicles, {} trip updates, {} alerts, {} unknown)\n\n",
        summary.total_entities,
        summary.vehicles,
        summary.trip_updates,
        summary.alerts,
        summary.unknown,
    ));

    for record in feed.records() {
        out.push_str(&format!(
            "{} [{}] trip={} route={} delay={} alert={} affected={}\n",
            record.entity_id,
            record.entity_type,
            record.trip_id,
            record.route_id,
            record.delay_seconds,
            record.alert_message,
            record.affected_routes,
        ));
    }

    out
}

/// Writes the plain-text report to `path`.
pub fn write_report(path: &str, feed: &Feed) -> Result<()> {
    std::fs::write(path, render_report(feed))?;
    Ok(())
}
