use chrono::{Datelike, Timelike};
use std::io::{self, Write};

use super::checksum::sentence;
use crate::flight::{FixSink, Sample};

const KNOTS_PER_M_S: f64 = 1.943_844;
const KPH_PER_M_S: f64 = 3.6;

/// Satellite-status chatter rotates over three epochs: nothing, then a GSA
/// fix summary, then a two-line GSV constellation report. The contents are
/// static; only the rotation is simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SatStatus {
    #[default]
    Quiet,
    Gsa,
    Gsv,
}

impl SatStatus {
    fn advance(self) -> Self {
        match self {
            SatStatus::Quiet => SatStatus::Gsa,
            SatStatus::Gsa => SatStatus::Gsv,
            SatStatus::Gsv => SatStatus::Quiet,
        }
    }
}

/// Renders each sample as one epoch's worth of NMEA sentences:
/// `$GPGGA`, the rotating satellite-status sentence, `$GPRMC`, `$GPVTG`.
pub struct NmeaEncoder<W> {
    out: W,
    status: SatStatus,
}

impl<W: Write> NmeaEncoder<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            status: SatStatus::default(),
        }
    }

    fn write_sentence(&mut self, payload: &str) -> io::Result<()> {
        self.out.write_all(sentence(payload).as_bytes())
    }
}

/// Split a signed decimal-degree value into integer degrees and decimal
/// minutes of its magnitude; the sign is carried by the hemisphere letter.
fn deg_min(value_deg: f64) -> (i32, f64) {
    let magnitude = value_deg.abs();
    let degrees = magnitude.trunc() as i32;
    (degrees, (magnitude - f64::from(degrees)) * 60.0)
}

impl<W: Write> FixSink for NmeaEncoder<W> {
    fn emit(&mut self, sample: &Sample) -> io::Result<()> {
        let t = sample.time;
        let (lat_deg, lat_min) = deg_min(sample.lat_deg);
        let lat_hem = if sample.lat_deg >= 0.0 { 'N' } else { 'S' };
        let (lon_deg, lon_min) = deg_min(sample.lon_deg);
        let lon_hem = if sample.lon_deg >= 0.0 { 'E' } else { 'W' };

        let hms = format!("{:02}{:02}{:02}.000", t.hour(), t.minute(), t.second());
        let position = format!(
            "{:02}{:07.4},{},{:03}{:07.4},{}",
            lat_deg, lat_min, lat_hem, lon_deg, lon_min, lon_hem
        );

        // fix quality 1, 5 satellites used, HDOP 2.4, 45 m geoid separation
        self.write_sentence(&format!(
            "GPGGA,{},{},1,05,02.4,{:.1},M,45.0,M,,",
            hms, position, sample.alt_m
        ))?;

        match self.status {
            SatStatus::Quiet => {}
            SatStatus::Gsa => {
                // 3-D fix on satellites 3, 7, 18, 19 and 22
                self.write_sentence("GPGSA,A,3,03,07,18,19,22,,,,,,,,3.3,2.4,2.3")?;
            }
            SatStatus::Gsv => {
                // 8 satellites tracked; 11, 12 and 27 without a fix yet
                self.write_sentence("GPGSV,2,1,08,03,89,276,30,07,63,181,22,11,,,,12,,,")?;
                self.write_sentence("GPGSV,2,2,08,18,73,111,35,19,33,057,27,22,57,173,37,27,,,")?;
            }
        }
        self.status = self.status.advance();

        let knots = sample.speed_m_s * KNOTS_PER_M_S;
        self.write_sentence(&format!(
            "GPRMC,{},A,{},{:.2},{:.2},{:02}{:02}{:02},,,A",
            hms,
            position,
            knots,
            sample.course_deg,
            t.day(),
            t.month(),
            t.year() % 100
        ))?;

        self.write_sentence(&format!(
            "GPVTG,{:.2},T,,,{:.2},N,{:.2},K,A",
            sample.course_deg,
            knots,
            sample.speed_m_s * KPH_PER_M_S
        ))
    }
}
