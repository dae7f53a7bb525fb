//! Planar geodesy over short distances.
//!
//! Everything here uses a flat-earth equirectangular approximation: latitude
//! and longitude differences are treated as planar coordinates, with the
//! longitude axis shrunk by the cosine of the mean latitude. Good enough for
//! the segment lengths a balloon or aircraft covers between two waypoints,
//! wrong for anything transcontinental.

/// Kilometers per degree of latitude on the approximation sphere.
pub const KM_PER_DEGREE: f64 = 111.194_926_6;

/// Course and distance from one point to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    /// Compass bearing, 0-360 degrees clockwise from north.
    pub course_deg: f64,
    pub distance_km: f64,
}

/// Compute the bearing and planar distance between two positions given in
/// signed decimal degrees.
///
/// Coincident points have no defined bearing; they come back as course 0
/// with distance 0.
pub fn bearing_and_distance(
    from_lat_deg: f64,
    from_lon_deg: f64,
    to_lat_deg: f64,
    to_lon_deg: f64,
) -> Vector {
    let d_lat = to_lat_deg - from_lat_deg;
    let d_lon = to_lon_deg - from_lon_deg;

    if d_lat == 0.0 && d_lon == 0.0 {
        return Vector {
            course_deg: 0.0,
            distance_km: 0.0,
        };
    }

    // atan2 measures counter-clockwise from the longitude axis; fold it into
    // a clockwise-from-north compass bearing
    let raw = d_lat.atan2(d_lon).to_degrees();
    let course_deg = if raw <= 90.0 { 90.0 - raw } else { 450.0 - raw };

    // equator-equivalent longitude difference
    let adj_lon = ((from_lat_deg + to_lat_deg) / 2.0).to_radians().cos() * d_lon;
    let distance_km = (d_lat * d_lat + adj_lon * adj_lon).sqrt() * KM_PER_DEGREE;

    Vector {
        course_deg,
        distance_km,
    }
}

const POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Map a 0-360 degree bearing onto the 16-point compass rose.
pub fn compass16(bearing_deg: f64) -> &'static str {
    let point = ((bearing_deg + 11.25) / 22.5) as usize & 0x0f;
    POINTS[point]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cardinal_bearings() {
        assert!(close(bearing_and_distance(0.0, 0.0, 1.0, 0.0).course_deg, 0.0));
        assert!(close(bearing_and_distance(0.0, 0.0, 0.0, 1.0).course_deg, 90.0));
        assert!(close(
            bearing_and_distance(0.0, 0.0, -1.0, 0.0).course_deg,
            180.0
        ));
        assert!(close(
            bearing_and_distance(0.0, 0.0, 0.0, -1.0).course_deg,
            270.0
        ));
    }

    #[test]
    fn course_depends_only_on_direction() {
        let short = bearing_and_distance(0.0, 0.0, 0.3, 0.7).course_deg;
        let long = bearing_and_distance(0.0, 0.0, 3.0, 7.0).course_deg;
        assert!(close(short, long));
    }

    #[test]
    fn one_degree_of_latitude() {
        let v = bearing_and_distance(0.0, 0.0, 1.0, 0.0);
        assert!((v.distance_km - KM_PER_DEGREE).abs() < 1e-6);
    }

    #[test]
    fn longitude_shrinks_with_latitude() {
        let equator = bearing_and_distance(0.0, 0.0, 0.0, 1.0).distance_km;
        let north = bearing_and_distance(60.0, 0.0, 60.0, 1.0).distance_km;
        assert!(north < equator * 0.6);
    }

    #[test]
    fn coincident_points() {
        let v = bearing_and_distance(51.5, -0.1, 51.5, -0.1);
        assert_eq!(v.course_deg, 0.0);
        assert_eq!(v.distance_km, 0.0);
    }

    #[test]
    fn compass_rose() {
        assert_eq!(compass16(0.0), "N");
        assert_eq!(compass16(11.24), "N");
        assert_eq!(compass16(11.3), "NNE");
        assert_eq!(compass16(90.0), "E");
        assert_eq!(compass16(225.0), "SW");
        assert_eq!(compass16(337.5), "NNW");
        assert_eq!(compass16(350.0), "N");
        assert_eq!(compass16(360.0), "N");
    }
}
