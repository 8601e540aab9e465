/// Mean Earth radius in meters. Radius queries divide by this to get an
/// angular radius, and multiply angular distances by it to get meters back.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two WGS84-ish coordinates,
/// via the haversine formula on a spherical Earth.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push a marginally above 1, which would make asin return NaN
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(haversine_distance_m(51.5, -0.1, 51.5, -0.1), 0.0);
    }

    #[test]
    fn london_to_paris() {
        // Charing Cross to Notre-Dame is roughly 341 km
        let dist = haversine_distance_m(51.5074, -0.1278, 48.8530, 2.3499);
        assert!((dist - 341_000.0).abs() < 5_000.0, "got {dist}");
    }

    #[test]
    fn small_latitude_offset() {
        // 0.0007 degrees of latitude is about 78 m anywhere on the sphere
        let dist = haversine_distance_m(51.5, -0.1, 51.5007, -0.1);
        assert!((dist - 77.8).abs() < 1.0, "got {dist}");
    }

    #[test]
    fn symmetric() {
        let there = haversine_distance_m(51.5, -0.1, 60.0, 10.0);
        let back = haversine_distance_m(60.0, 10.0, 51.5, -0.1);
        assert!((there - back).abs() < 1e-6);
    }
}
