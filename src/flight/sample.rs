use chrono::{DateTime, Utc};

/// One interpolated per-second position within a segment. Position and
/// altitude step linearly; course and speed are segment-constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
    pub course_deg: f64,
    pub speed_m_s: f64,
}
