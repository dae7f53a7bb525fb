use chrono::{DateTime, Duration, Utc};
use std::io::{self, BufRead};
use thiserror::Error;

use super::{Sample, Segment};
use crate::kml::{CoordinateSource, KmlError};

#[derive(Debug, Error)]
pub enum FlightError {
    #[error(transparent)]
    Kml(#[from] KmlError),
    #[error("write error: {0}")]
    Io(#[from] io::Error),
}

/// Where encoded fixes go. One implementation per wire format.
pub trait FixSink {
    fn emit(&mut self, sample: &Sample) -> io::Result<()>;
}

/// Walk the trajectory segment by segment, streaming every per-second
/// sample into the sink.
///
/// The driver holds one waypoint at a time: each further coordinate closes
/// a segment, the segment's samples are emitted, and the new coordinate
/// becomes the held one. The last waypoint never opens a segment, so it is
/// reported once at the end as a stationary fix.
pub fn fly<R: BufRead, S: FixSink>(
    source: &mut CoordinateSource<R>,
    sink: &mut S,
    start: DateTime<Utc>,
) -> Result<(), FlightError> {
    source.open()?;

    let mut held = source.first_waypoint()?;
    let mut clock = start;
    let mut segments = 0u32;

    while let Some(next) = source.next_waypoint()? {
        let segment = Segment::new(held, next);
        log::debug!(
            "segment {}: {} s, course {:.1} deg, {:.1} m/s, vertical {:+.2} m/s",
            segments,
            segment.duration_s(),
            segment.course_deg(),
            segment.speed_m_s(),
            segment.rate_m_s(),
        );

        for sample in segment.samples(clock) {
            sink.emit(&sample)?;
        }

        clock += Duration::seconds(i64::from(segment.duration_s()));
        held = next;
        segments += 1;
    }

    // final position, assumed stationary
    sink.emit(&Sample {
        time: clock,
        lat_deg: held.lat_deg,
        lon_deg: held.lon_deg,
        alt_m: held.alt_m,
        course_deg: 0.0,
        speed_m_s: 0.0,
    })?;

    source.close()?;
    log::info!("trajectory complete: {} segments", segments);
    Ok(())
}
