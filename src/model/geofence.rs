use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AttendanceError, model::location::Location};

/// Mean Earth radius used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres (Haversine).
pub fn distance_km(a: &Location, b: &Location) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// A named circular working area. Only one fence is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoFence {
    #[schema(example = "fence-1")]
    pub id: String,
    #[schema(example = "Main Office")]
    pub name: String,
    pub center: Location,
    #[schema(example = 2.0)]
    pub radius_km: f64,
    pub active: bool,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl GeoFence {
    pub fn distance_from_center(&self, point: &Location) -> f64 {
        distance_km(point, &self.center)
    }

    /// Boundary inclusive.
    pub fn contains(&self, point: &Location) -> bool {
        self.distance_from_center(point) <= self.radius_km
    }

    /// Like [`GeoFence::contains`] but reports how far outside the point is.
    pub fn check(&self, point: &Location) -> Result<f64, AttendanceError> {
        let distance_km = self.distance_from_center(point);
        if distance_km <= self.radius_km {
            Ok(distance_km)
        } else {
            Err(AttendanceError::OutsideGeofence {
                fence_name: self.name.clone(),
                distance_km,
                radius_km: self.radius_km,
            })
        }
    }
}

/// Parameters a manager supplies when replacing the active fence.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGeoFence {
    pub name: String,
    pub center: Location,
    pub radius_km: f64,
}

impl NewGeoFence {
    pub fn validate(&self) -> Result<(), AttendanceError> {
        if self.name.trim().is_empty() {
            return Err(AttendanceError::Validation(
                "fence name must not be empty".to_string(),
            ));
        }
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(AttendanceError::Validation(format!(
                "radius must be a positive number of kilometres, got {}",
                self.radius_km
            )));
        }
        self.center.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> Location {
        Location::new(51.5074, -0.1278).unwrap()
    }

    fn office(radius_km: f64) -> GeoFence {
        GeoFence {
            id: "fence-1".to_string(),
            name: "Main Office".to_string(),
            center: london(),
            radius_km,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_km(&london(), &london()), 0.0);
    }

    #[test]
    fn distance_is_symmetric_and_non_negative() {
        let points = [
            london(),
            Location::new(51.60, -0.20).unwrap(),
            Location::new(-33.8688, 151.2093).unwrap(),
            Location::new(40.7128, -74.0060).unwrap(),
            Location::new(0.0, 179.9).unwrap(),
            Location::new(0.0, -179.9).unwrap(),
        ];
        for a in &points {
            for b in &points {
                let ab = distance_km(a, b);
                let ba = distance_km(b, a);
                assert!(ab >= 0.0);
                assert!((ab - ba).abs() < 1e-9, "{a} / {b}: {ab} vs {ba}");
            }
        }
    }

    #[test]
    fn known_distances() {
        let north = Location::new(51.60, -0.20).unwrap();
        let d = distance_km(&london(), &north);
        assert!((d - 11.44).abs() < 0.05, "got {d}");

        // London to Paris is roughly 344 km.
        let paris = Location::new(48.8566, 2.3522).unwrap();
        let d = distance_km(&london(), &paris);
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn contains_center_and_rejects_far_points() {
        let fence = office(2.0);
        assert!(fence.contains(&london()));
        assert!(!fence.contains(&Location::new(51.60, -0.20).unwrap()));
    }

    #[test]
    fn boundary_is_inclusive() {
        let point = Location::new(51.5254, -0.1278).unwrap();
        let exact = distance_km(&point, &london());
        let fence = office(exact);
        assert!(fence.contains(&point));
        assert_eq!(fence.check(&point).unwrap(), exact);
    }

    #[test]
    fn check_reports_distance_and_radius() {
        let fence = office(2.0);
        match fence.check(&Location::new(51.60, -0.20).unwrap()) {
            Err(AttendanceError::OutsideGeofence {
                distance_km,
                radius_km,
                ..
            }) => {
                assert!(distance_km > 11.0);
                assert_eq!(radius_km, 2.0);
            }
            other => panic!("expected OutsideGeofence, got {other:?}"),
        }
    }

    #[test]
    fn new_fence_validation() {
        let valid = NewGeoFence {
            name: "Depot".to_string(),
            center: london(),
            radius_km: 0.5,
        };
        assert!(valid.validate().is_ok());

        for radius_km in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let fence = NewGeoFence {
                radius_km,
                ..valid.clone()
            };
            assert!(fence.validate().is_err(), "radius {radius_km} accepted");
        }

        let unnamed = NewGeoFence {
            name: "  ".to_string(),
            ..valid.clone()
        };
        assert!(unnamed.validate().is_err());

        let bad_center = NewGeoFence {
            center: Location {
                latitude: 95.0,
                longitude: 0.0,
            },
            ..valid
        };
        assert!(bad_center.validate().is_err());
    }
}
