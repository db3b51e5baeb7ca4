/// Mean Earth radius in meters, matching the check-in geofence contract.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two WGS-84 coordinates, in meters
/// (haversine).
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_M * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn within_radius(distance_m: f64, radius_m: f64) -> bool {
    distance_m <= radius_m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(distance_meters(13.736717, 100.523186, 13.736717, 100.523186), 0.0);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_meters(13.0, 100.0, 14.0, 100.0);
        assert!((d - 111_195.0).abs() < 100.0, "got {}", d);
    }

    #[test]
    fn short_campus_distances_are_plausible() {
        // ~157 m for 0.001 deg lat + 0.001 deg lon near Bangkok.
        let d = distance_meters(13.7367, 100.5232, 13.7377, 100.5242);
        assert!(d > 140.0 && d < 170.0, "got {}", d);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        assert!(within_radius(100.0, 100.0));
        assert!(within_radius(0.0, 100.0));
        assert!(!within_radius(100.1, 100.0));
    }
}
