//! Decoded feed model and the flat records handed to exporters.
//!
//! The decoder itself works with the tagged [`EntityKind`] union; the fixed
//! seven-column [`EntityRecord`] shape exists only at the export seam.

use serde::Serialize;

/// Version stamped on every decoded header. The observed feeds never carry a
/// version on the wire, so this is a layer constant, not a parsed value.
pub const FEED_VERSION: &str = "1.0";

/// Placeholder written into tabular exports for attributes that do not apply
/// to an entity's kind.
pub const NOT_APPLICABLE: &str = "N/A";

/// One decoded feed: header plus entities in source-buffer order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub header: FeedHeader,
    pub entities: Vec<FeedEntity>,
}

impl Feed {
    /// Flattens every entity into the tabular export shape, preserving feed
    /// order.
    pub fn records(&self) -> Vec<EntityRecord> {
        self.entities.iter().map(EntityRecord::from_entity).collect()
    }
}

/// Feed-level metadata. `timestamp` is POSIX seconds, 0 when the feed omits
/// it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedHeader {
    pub version: String,
    pub timestamp: u64,
}

impl Default for FeedHeader {
    fn default() -> Self {
        Self {
            version: FEED_VERSION.to_string(),
            timestamp: 0,
        }
    }
}

/// One record in the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntity {
    pub id: String,
    #[serde(flatten)]
    pub kind: EntityKind,
}

/// The three entity kinds this decoder understands, plus a forward-compatible
/// catch-all for entities carrying none of the known payload fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Vehicle(VehicleInfo),
    TripUpdate(TripUpdateInfo),
    Alert(AlertInfo),
    Unknown,
}

impl EntityKind {
    /// Text form used in exports and logs.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Vehicle(_) => "vehicle",
            EntityKind::TripUpdate(_) => "trip_update",
            EntityKind::Alert(_) => "alert",
            EntityKind::Unknown => "unknown",
        }
    }
}

/// Trip descriptor attributes shared by vehicle positions and trip updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripInfo {
    pub trip_id: Option<String>,
    pub route_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleInfo {
    #[serde(flatten)]
    pub trip: TripInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripUpdateInfo {
    #[serde(flatten)]
    pub trip: TripInfo,
    /// Seconds of delay; negative means running early. Only trip updates
    /// carry this.
    pub delay_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertInfo {
    pub alert_message: Option<String>,
    pub affected_routes: Option<String>,
}

/// One row of the tabular export contract.
///
/// Every column is a string; attributes that do not apply to the entity's
/// kind carry [`NOT_APPLICABLE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    #[serde(rename = "Entity_ID")]
    pub entity_id: String,
    #[serde(rename = "Type")]
    pub entity_type: String,
    #[serde(rename = "Route_ID")]
    pub route_id: String,
    #[serde(rename = "Trip_ID")]
    pub trip_id: String,
    #[serde(rename = "Delay_Seconds")]
    pub delay_seconds: String,
    #[serde(rename = "Alert_Message")]
    pub alert_message: String,
    #[serde(rename = "Affected_Routes")]
    pub affected_routes: String,
}

impl EntityRecord {
    /// Flattens a decoded entity into the fixed seven-column shape.
    pub fn from_entity(entity: &FeedEntity) -> Self {
        let mut record = Self {
            entity_id: entity.id.clone(),
            entity_type: entity.kind.label().to_string(),
            route_id: NOT_APPLICABLE.to_string(),
            trip_id: NOT_APPLICABLE.to_string(),
            delay_seconds: NOT_APPLICABLE.to_string(),
            alert_message: NOT_APPLICABLE.to_string(),
            affected_routes: NOT_APPLICABLE.to_string(),
        };

        match &entity.kind {
            EntityKind::Vehicle(vehicle) => record.fill_trip(&vehicle.trip),
            EntityKind::TripUpdate(update) => {
                record.fill_trip(&update.trip);
                if let Some(delay) = update.delay_seconds {
                    record.delay_seconds = delay.to_string();
                }
            }
            EntityKind::Alert(alert) => {
                if let Some(message) = &alert.alert_message {
                    record.alert_message = message.clone();
                }
                if let Some(routes) = &alert.affected_routes {
                    record.affected_routes = routes.clone();
                }
            }
            EntityKind::Unknown => {}
        }

        record
    }

    fn fill_trip(&mut self, trip: &TripInfo) {
        if let Some(trip_id) = &trip.trip_id {
            self.trip_id = trip_id.clone();
        }
        if let Some(route_id) = &trip.route_id {
            self.route_id = route_id.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header() {
        let header = FeedHeader::default();
        assert_eq!(header.version, "1.0");
        assert_eq!(header.timestamp, 0);
    }

    #[test]
    fn test_record_from_vehicle() {
        let entity = FeedEntity {
            id: "v1".to_string(),
            kind: EntityKind::Vehicle(VehicleInfo {
                trip: TripInfo {
                    trip_id: Some("trip-1".to_string()),
                    route_id: Some("route-1".to_string()),
                },
            }),
        };

        let record = EntityRecord::from_entity(&entity);
        assert_eq!(record.entity_id, "v1");
        assert_eq!(record.entity_type, "vehicle");
        assert_eq!(record.trip_id, "trip-1");
        assert_eq!(record.route_id, "route-1");
        assert_eq!(record.delay_seconds, NOT_APPLICABLE);
        assert_eq!(record.alert_message, NOT_APPLICABLE);
        assert_eq!(record.affected_routes, NOT_APPLICABLE);
    }

    #[test]
    fn test_record_from_trip_update_with_delay() {
        let entity = FeedEntity {
            id: "u1".to_string(),
            kind: EntityKind::TripUpdate(TripUpdateInfo {
                trip: TripInfo {
                    trip_id: Some("trip-2".to_string()),
                    route_id: None,
                },
                delay_seconds: Some(-90),
            }),
        };

        let record = EntityRecord::from_entity(&entity);
        assert_eq!(record.entity_type, "trip_update");
        assert_eq!(record.trip_id, "trip-2");
        assert_eq!(record.route_id, NOT_APPLICABLE);
        assert_eq!(record.delay_seconds, "-90");
    }

    #[test]
    fn test_record_from_alert() {
        let entity = FeedEntity {
            id: "a1".to_string(),
            kind: EntityKind::Alert(AlertInfo {
                alert_message: Some("Service Alert".to_string()),
                affected_routes: Some("142S".to_string()),
            }),
        };

        let record = EntityRecord::from_entity(&entity);
        assert_eq!(record.entity_type, "alert");
        assert_eq!(record.alert_message, "Service Alert");
        assert_eq!(record.affected_routes, "142S");
        assert_eq!(record.trip_id, NOT_APPLICABLE);
    }

    #[test]
    fn test_record_from_unknown() {
        let entity = FeedEntity {
            id: "x1".to_string(),
            kind: EntityKind::Unknown,
        };

        let record = EntityRecord::from_entity(&entity);
        assert_eq!(record.entity_type, "unknown");
        assert_eq!(record.trip_id, NOT_APPLICABLE);
        assert_eq!(record.affected_routes, NOT_APPLICABLE);
    }

    #[test]
    fn test_entity_serializes_flat() {
        let entity = FeedEntity {
            id: "v1".to_string(),
            kind: EntityKind::Vehicle(VehicleInfo {
                trip: TripInfo {
                    trip_id: Some("t".to_string()),
                    route_id: None,
                },
            }),
        };

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["id"], "v1");
        assert_eq!(json["type"], "vehicle");
        assert_eq!(json["trip_id"], "t");
    }
}
