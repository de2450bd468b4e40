//! Schemaless protobuf parser for GTFS Realtime feeds.
//!
//! Interprets raw bytes using only the wire-format rules, with a fixed table
//! of field numbers mapped onto the attributes this tool surfaces. Unknown
//! fields are walked past so newer feeds keep decoding; structurally corrupt
//! buffers abort with a [`WireError`].

use tracing::warn;

use crate::feed::{
    AlertInfo, EntityKind, Feed, FeedEntity, FeedHeader, TripInfo, TripUpdateInfo, VehicleInfo,
};
use crate::wire::{FieldValue, WireError, walk_fields};

/// Fixed message attached to every alert. The target feed never carries
/// human-readable alert text on the wire.
pub const ALERT_MESSAGE: &str = "Service Alert";

// Top-level feed fields.
const FEED_HEADER: u64 = 1;
const FEED_ENTITY: u64 = 2;

// FeedHeader fields.
const HEADER_TIMESTAMP: u64 = 2;

// FeedEntity fields.
const ENTITY_ID: u64 = 1;
const ENTITY_TRIP_UPDATE: u64 = 2;
const ENTITY_VEHICLE: u64 = 3;
const ENTITY_ALERT: u64 = 4;

// TripDescriptor fields, shared by vehicle positions and trip updates.
// Field 2 sits between these and is not surfaced.
const TRIP_TRIP_ID: u64 = 1;
const TRIP_ROUTE_ID: u64 = 3;

// VehiclePosition fields. Position/GPS fields are not surfaced.
const VEHICLE_TRIP: u64 = 1;

// TripUpdate fields.
const TRIP_UPDATE_TRIP: u64 = 1;
const TRIP_UPDATE_DELAY: u64 = 5;

// Alert fields. 1-6 (time window, informed entity, cause/effect) are not
// surfaced; the target feed repurposes 7 for a route identifier.
const ALERT_ROUTE: u64 = 7;

/// Decodes a protobuf-encoded GTFS-RT feed from raw bytes.
///
/// Entities come back in the order they appear in the buffer. A feed without
/// a header gets the default header rather than an error; if the header
/// field repeats, the last occurrence wins.
///
/// # Errors
///
/// Returns a [`WireError`] if the envelope is structurally corrupt: a
/// truncated varint, a length-delimited field running past the buffer, or a
/// fixed-width wire type whose length cannot be known without a schema.
pub fn parse_feed(bytes: &[u8]) -> Result<Feed, WireError> {
    let mut header = FeedHeader::default();
    let mut entities = Vec::new();

    for field in walk_fields(bytes, 0, bytes.len()) {
        let field = field?;
        match (field.number, field.value) {
            (FEED_HEADER, FieldValue::LengthDelimited(payload)) => {
                header = parse_header(payload)?;
            }
            (FEED_ENTITY, FieldValue::LengthDelimited(payload)) => {
                entities.push(parse_entity(payload)?);
            }
            _ => {}
        }
    }

    Ok(Feed { header, entities })
}

/// Decodes the feed header sub-message. A missing timestamp stays 0.
pub fn parse_header(payload: &[u8]) -> Result<FeedHeader, WireError> {
    let mut header = FeedHeader::default();

    for field in walk_fields(payload, 0, payload.len()) {
        let field = field?;
        if let (HEADER_TIMESTAMP, FieldValue::Varint(timestamp)) = (field.number, field.value) {
            header.timestamp = timestamp;
        }
    }

    Ok(header)
}

/// Decodes one feed entity and dispatches its nested payload to the matching
/// extractor.
///
/// An entity structurally carries at most one of the three payload fields;
/// should more than one appear anyway, the last one seen wins. An entity
/// carrying none of them comes back as [`EntityKind::Unknown`] with its id
/// intact.
pub fn parse_entity(payload: &[u8]) -> Result<FeedEntity, WireError> {
    let mut id = String::new();
    let mut kind = EntityKind::Unknown;

    for field in walk_fields(payload, 0, payload.len()) {
        let field = field?;
        let FieldValue::LengthDelimited(bytes) = field.value else {
            continue;
        };
        match field.number {
            ENTITY_ID => {
                id = decode_text(field.number, field.offset, bytes).unwrap_or_default();
            }
            ENTITY_TRIP_UPDATE => {
                kind = EntityKind::TripUpdate(extract_trip_update_info(bytes)?);
            }
            ENTITY_VEHICLE => {
                kind = EntityKind::Vehicle(extract_vehicle_info(bytes)?);
            }
            ENTITY_ALERT => {
                kind = EntityKind::Alert(extract_alert_info(bytes)?);
            }
            _ => {}
        }
    }

    Ok(FeedEntity { id, kind })
}

/// Pulls the nested trip descriptor out of a vehicle position. GPS position
/// fields are left alone.
fn extract_vehicle_info(payload: &[u8]) -> Result<VehicleInfo, WireError> {
    let mut info = VehicleInfo::default();

    for field in walk_fields(payload, 0, payload.len()) {
        let field = field?;
        if let (VEHICLE_TRIP, FieldValue::LengthDelimited(bytes)) = (field.number, field.value) {
            info.trip = extract_trip_info(bytes)?;
        }
    }

    Ok(info)
}

/// Decodes a trip update: the nested trip descriptor plus the delay, the one
/// attribute only this entity kind carries.
fn extract_trip_update_info(payload: &[u8]) -> Result<TripUpdateInfo, WireError> {
    let mut info = TripUpdateInfo::default();

    for field in walk_fields(payload, 0, payload.len()) {
        let field = field?;
        match (field.number, field.value) {
            (TRIP_UPDATE_TRIP, FieldValue::LengthDelimited(bytes)) => {
                info.trip = extract_trip_info(bytes)?;
            }
            (TRIP_UPDATE_DELAY, FieldValue::Varint(delay)) => {
                // int32 on the wire; reinterpret so early vehicles come out
                // negative.
                info.delay_seconds = Some(delay as i64);
            }
            _ => {}
        }
    }

    Ok(info)
}

/// Shared trip descriptor decoding for vehicle positions and trip updates.
fn extract_trip_info(payload: &[u8]) -> Result<TripInfo, WireError> {
    let mut info = TripInfo::default();

    for field in walk_fields(payload, 0, payload.len()) {
        let field = field?;
        let FieldValue::LengthDelimited(bytes) = field.value else {
            continue;
        };
        match field.number {
            TRIP_TRIP_ID => info.trip_id = decode_text(field.number, field.offset, bytes),
            TRIP_ROUTE_ID => info.route_id = decode_text(field.number, field.offset, bytes),
            _ => {}
        }
    }

    Ok(info)
}

/// Decodes a service alert as the target feed actually emits it: no text,
/// with field 7 carrying a route identifier. When the route is present the
/// message is stamped with [`ALERT_MESSAGE`]; when it is absent both
/// attributes stay empty rather than inventing a route.
fn extract_alert_info(payload: &[u8]) -> Result<AlertInfo, WireError> {
    let mut info = AlertInfo::default();

    for field in walk_fields(payload, 0, payload.len()) {
        let field = field?;
        if let (ALERT_ROUTE, FieldValue::LengthDelimited(bytes)) = (field.number, field.value) {
            if let Some(route) = decode_text(field.number, field.offset, bytes) {
                info.affected_routes = Some(route);
                info.alert_message = Some(ALERT_MESSAGE.to_string());
            }
        }
    }

    Ok(info)
}

/// Decodes a length-delimited payload as UTF-8 text.
///
/// Corrupt text degrades to `None` for that one attribute instead of
/// aborting the entity; one malformed string should not discard the rest of
/// an otherwise well-formed feed.
fn decode_text(field: u64, offset: usize, bytes: &[u8]) -> Option<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text.to_string()),
        Err(error) => {
            warn!(field, offset, %error, "Payload is not valid UTF-8, dropping attribute");
            None
        }
    }
}
