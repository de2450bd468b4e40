use serde::Serialize;

use crate::feed::{EntityKind, Feed};

/// Per-kind counts and attribute coverage for one decoded feed.
#[derive(Debug, Default, Serialize)]
pub struct FeedSummary {
    pub total_entities: usize,

    // entity kinds
    pub vehicles: usize,
    pub trip_updates: usize,
    pub alerts: usize,
    pub unknown: usize,

    // attribute coverage
    pub with_trip_id: usize,
    pub with_route_id: usize,
    pub with_delay: usize,
    pub with_affected_routes: usize,
}

impl FeedSummary {
    pub fn from_feed(feed: &Feed) -> Self {
        let mut s = FeedSummary {
            total_entities: feed.entities.len(),
            ..Default::default()
        };

        for e in &feed.entities {
            match &e.kind {
                EntityKind::Vehicle(vehicle) => {
                    s.vehicles += 1;

                    if vehicle.trip.trip_id.is_some() {
                        s.with_trip_id += 1;
                    }

                    if vehicle.trip.route_id.is_some() {
                        s.with_route_id += 1;
                    }
                }

                EntityKind::TripUpdate(update) => {
                    s.trip_updates += 1;

                    if update.trip.trip_id.is_some() {
                        s.with_trip_id += 1;
                    }

                    if update.trip.route_id.is_some() {
                        s.with_route_id += 1;
                    }

                    if update.delay_seconds.is_some() {
                        s.with_delay += 1;
                    }
                }

                EntityKind::Alert(alert) => {
                    s.alerts += 1;

                    if alert.affected_routes.is_some() {
                        s.with_affected_routes += 1;
                    }
                }

                EntityKind::Unknown => {
                    s.unknown += 1;
                }
            }
        }

        s
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn delay_pct(&self) -> f64 {
        Self::pct(self.with_delay, self.trip_updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{
        AlertInfo, FeedEntity, FeedHeader, TripInfo, TripUpdateInfo, VehicleInfo,
    };

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(FeedSummary::pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(FeedSummary::pct(50, 100), 50.0);
        assert_eq!(FeedSummary::pct(1, 4), 25.0);
    }

    #[test]
    fn test_from_feed_empty() {
        let feed = Feed {
            header: FeedHeader::default(),
            entities: vec![],
        };
        let summary = FeedSummary::from_feed(&feed);

        assert_eq!(summary.total_entities, 0);
        assert_eq!(summary.vehicles, 0);
        assert_eq!(summary.unknown, 0);
    }

    #[test]
    fn test_from_feed_counts_kinds_and_coverage() {
        let feed = Feed {
            header: FeedHeader::default(),
            entities: vec![
                FeedEntity {
                    id: "v1".to_string(),
                    kind: EntityKind::Vehicle(VehicleInfo {
                        trip: TripInfo {
                            trip_id: Some("t1".to_string()),
                            route_id: Some("r1".to_string()),
                        },
                    }),
                },
                FeedEntity {
                    id: "u1".to_string(),
                    kind: EntityKind::TripUpdate(TripUpdateInfo {
                        trip: TripInfo {
                            trip_id: Some("t2".to_string()),
                            route_id: None,
                        },
                        delay_seconds: Some(45),
                    }),
                },
                FeedEntity {
                    id: "a1".to_string(),
                    kind: EntityKind::Alert(AlertInfo {
                        alert_message: Some("Service Alert".to_string()),
                        affected_routes: Some("142S".to_string()),
                    }),
                },
                FeedEntity {
                    id: "x1".to_string(),
                    kind: EntityKind::Unknown,
                },
            ],
        };

        let summary = FeedSummary::from_feed(&feed);

        assert_eq!(summary.total_entities, 4);
        assert_eq!(summary.vehicles, 1);
        assert_eq!(summary.trip_updates, 1);
        assert_eq!(summary.alerts, 1);
        assert_eq!(summary.unknown, 1);
        assert_eq!(summary.with_trip_id, 2);
        assert_eq!(summary.with_route_id, 1);
        assert_eq!(summary.with_delay, 1);
        assert_eq!(summary.with_affected_routes, 1);
    }

    #[test]
    fn test_delay_pct() {
        let summary = FeedSummary {
            trip_updates: 4,
            with_delay: 3,
            ..Default::default()
        };

        assert_eq!(summary.delay_pct(), 75.0);
    }
}
