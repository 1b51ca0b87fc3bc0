use geo::{Distance, Haversine, Point};
use qeats_core::models::GeoPoint;

/// Convert a GeoPoint to a geo::Point (x = longitude, y = latitude)
pub fn to_geo_point(point: &GeoPoint) -> Point {
    Point::new(point.longitude, point.latitude)
}

/// Great-circle distance between two points in kilometers.
///
/// Haversine on a sphere of Earth's mean radius.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    Haversine.distance(to_geo_point(a), to_geo_point(b)) / 1000.0
}

/// Whether `candidate` lies strictly inside `radius_km` of `center`
pub fn within_radius(center: &GeoPoint, candidate: &GeoPoint, radius_km: f64) -> bool {
    distance_km(center, candidate) < radius_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE_KM: f64 = 1e-3;

    fn point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
    }

    #[test]
    fn test_known_distance() {
        // Bengaluru MG Road to Koramangala, roughly 5.3km
        let mg_road = GeoPoint::new(12.9756, 77.6066);
        let koramangala = GeoPoint::new(12.9352, 77.6245);

        let d = distance_km(&mg_road, &koramangala);
        assert!((4.5..6.0).contains(&d), "unexpected distance {}", d);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(&GeoPoint::new(0.0, 0.0), &GeoPoint::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "unexpected distance {}", d);
    }

    #[test]
    fn test_within_radius_is_strict() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = distance_km(&a, &b);

        assert!(!within_radius(&a, &b, d));
        assert!(within_radius(&a, &b, d + 0.001));
        assert!(!within_radius(&a, &a, 0.0));
    }

    proptest! {
        #[test]
        fn prop_distance_to_self_is_zero(a in point()) {
            prop_assert_eq!(distance_km(&a, &a), 0.0);
        }

        #[test]
        fn prop_distance_is_symmetric_and_non_negative(a in point(), b in point()) {
            let ab = distance_km(&a, &b);
            let ba = distance_km(&b, &a);
            prop_assert!(ab >= 0.0);
            prop_assert!((ab - ba).abs() < TOLERANCE_KM);
        }

        #[test]
        fn prop_triangle_inequality(a in point(), b in point(), c in point()) {
            let ab = distance_km(&a, &b);
            let ac = distance_km(&a, &c);
            let cb = distance_km(&c, &b);
            prop_assert!(ab <= ac + cb + TOLERANCE_KM);
        }

        #[test]
        fn prop_distance_bounded_by_half_circumference(a in point(), b in point()) {
            prop_assert!(distance_km(&a, &b) <= 20_015.1);
        }
    }
}
