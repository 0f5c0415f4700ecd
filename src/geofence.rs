use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in meters (haversine).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = 40.0)]
    pub latitude: f64,
    #[schema(example = -74.0005)]
    pub longitude: f64,
}

impl GeoPoint {
    /// Both coordinates finite and within geographic bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Circular boundary around the office, built once from config at startup.
#[derive(Debug, Clone, Copy)]
pub struct Geofence {
    center: GeoPoint,
    radius_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceEval {
    /// Great-circle distance to the office center, rounded to the nearest meter.
    pub distance_m: f64,
    /// distance_m <= radius, boundary inclusive.
    pub in_radius: bool,
}

impl Geofence {
    pub fn new(center: GeoPoint, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    /// Classify a point against the office boundary. Callers must validate
    /// the point first; this function assumes in-bounds coordinates.
    pub fn evaluate(&self, point: GeoPoint) -> GeofenceEval {
        let distance_m = haversine_m(point, self.center).round();
        GeofenceEval {
            distance_m,
            in_radius: distance_m <= self.radius_m,
        }
    }
}

fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFICE: GeoPoint = GeoPoint {
        latitude: 40.0,
        longitude: -74.0,
    };

    #[test]
    fn distance_is_symmetric() {
        let p = GeoPoint {
            latitude: 40.0050,
            longitude: -74.0003,
        };
        assert_eq!(haversine_m(p, OFFICE), haversine_m(OFFICE, p));
    }

    #[test]
    fn near_point_is_inside() {
        let fence = Geofence::new(OFFICE, 100.0);
        let eval = fence.evaluate(GeoPoint {
            latitude: 40.0,
            longitude: -74.0005,
        });
        // roughly 42-43 m east of center
        assert!(eval.distance_m >= 41.0 && eval.distance_m <= 44.0);
        assert!(eval.in_radius);
    }

    #[test]
    fn far_point_is_outside() {
        let fence = Geofence::new(OFFICE, 100.0);
        let eval = fence.evaluate(GeoPoint {
            latitude: 40.0050,
            longitude: -74.0,
        });
        // roughly 555-556 m north of center
        assert!(eval.distance_m >= 554.0 && eval.distance_m <= 557.0);
        assert!(!eval.in_radius);
    }

    #[test]
    fn boundary_distance_counts_as_inside() {
        let point = GeoPoint {
            latitude: 40.0,
            longitude: -74.0005,
        };
        let distance = haversine_m(point, OFFICE).round();
        let fence = Geofence::new(OFFICE, distance);
        assert!(fence.evaluate(point).in_radius);
    }

    #[test]
    fn center_is_zero_meters_away() {
        let fence = Geofence::new(OFFICE, 100.0);
        let eval = fence.evaluate(OFFICE);
        assert_eq!(eval.distance_m, 0.0);
        assert!(eval.in_radius);
    }

    #[test]
    fn coordinate_bounds() {
        assert!(GeoPoint { latitude: 90.0, longitude: 180.0 }.is_valid());
        assert!(GeoPoint { latitude: -90.0, longitude: -180.0 }.is_valid());
        assert!(!GeoPoint { latitude: 90.5, longitude: 0.0 }.is_valid());
        assert!(!GeoPoint { latitude: 0.0, longitude: 180.5 }.is_valid());
        assert!(!GeoPoint { latitude: f64::NAN, longitude: 0.0 }.is_valid());
        assert!(!GeoPoint { latitude: 0.0, longitude: f64::INFINITY }.is_valid());
    }
}
