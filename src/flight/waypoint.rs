/// One longitude/latitude/altitude coordinate read from the source
/// trajectory. Signed decimal degrees, positive east/north; altitude in
/// meters above mean sea level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub alt_m: f64,
}
