use chrono::{DateTime, Duration, Utc};

use super::{Sample, Waypoint};
use crate::geo;

/// Climb rate, and the descent rate at ground level.
const ASCENT_RATE_M_S: f64 = 5.0;
/// Base of the descent-rate decay curve.
const DECAY_BASE: f64 = std::f64::consts::SQRT_2;
/// Altitude scale of the descent-rate decay curve, meters.
const DECAY_SCALE_M: f64 = 5300.0;

const M_PER_KM: f64 = 1000.0;

/// The interval between two consecutive waypoints.
///
/// Ascent is linear at a fixed rate. Descent slows near the ground: the rate
/// is the ground-level rate divided by the geometric mean of the decay
/// factors at the two endpoint altitudes, so it is exactly 5 m/s between
/// sea-level waypoints and strictly slower anywhere above.
///
/// Course and speed are computed once over the whole segment and shared by
/// every sample in it.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    from: Waypoint,
    to: Waypoint,
    duration_s: u32,
    course_deg: f64,
    speed_m_s: f64,
    rate_m_s: f64,
}

impl Segment {
    pub fn new(from: Waypoint, to: Waypoint) -> Self {
        let d_alt = to.alt_m - from.alt_m;

        let rate_m_s = if d_alt >= 0.0 {
            ASCENT_RATE_M_S
        } else {
            let mean_decay = (DECAY_BASE.powf(from.alt_m / DECAY_SCALE_M)
                * DECAY_BASE.powf(to.alt_m / DECAY_SCALE_M))
            .sqrt();
            -ASCENT_RATE_M_S / mean_decay
        };

        // rate carries the sign of d_alt, so elapsed is never negative
        let elapsed = d_alt / rate_m_s;
        let mut duration_s = elapsed.trunc() as u32;
        if elapsed.fract() >= 0.5 {
            duration_s += 1;
        }
        // level or near-level pairs still cover one second
        duration_s = duration_s.max(1);

        let vector = geo::bearing_and_distance(from.lat_deg, from.lon_deg, to.lat_deg, to.lon_deg);
        let speed_m_s = vector.distance_km * M_PER_KM / f64::from(duration_s);

        Segment {
            from,
            to,
            duration_s,
            course_deg: vector.course_deg,
            speed_m_s,
            rate_m_s,
        }
    }

    pub fn duration_s(&self) -> u32 {
        self.duration_s
    }

    pub fn course_deg(&self) -> f64 {
        self.course_deg
    }

    pub fn speed_m_s(&self) -> f64 {
        self.speed_m_s
    }

    pub fn rate_m_s(&self) -> f64 {
        self.rate_m_s
    }

    /// Per-second samples from `from` (inclusive) to `to` (exclusive). The
    /// `to` waypoint is not emitted here; it opens the next segment.
    pub fn samples(&self, start: DateTime<Utc>) -> Samples {
        let steps = f64::from(self.duration_s);
        Samples {
            next: Sample {
                time: start,
                lat_deg: self.from.lat_deg,
                lon_deg: self.from.lon_deg,
                alt_m: self.from.alt_m,
                course_deg: self.course_deg,
                speed_m_s: self.speed_m_s,
            },
            d_lat: (self.to.lat_deg - self.from.lat_deg) / steps,
            d_lon: (self.to.lon_deg - self.from.lon_deg) / steps,
            d_alt: (self.to.alt_m - self.from.alt_m) / steps,
            remaining: self.duration_s,
        }
    }
}

/// Lazy, forward-only sample sequence for one segment.
pub struct Samples {
    next: Sample,
    d_lat: f64,
    d_lon: f64,
    d_alt: f64,
    remaining: u32,
}

impl Iterator for Samples {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.next;
        self.next.time = current.time + Duration::seconds(1);
        self.next.lat_deg += self.d_lat;
        self.next.lon_deg += self.d_lon;
        self.next.alt_m += self.d_alt;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}
