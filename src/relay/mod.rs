//! Re-pacing of a pre-recorded NMEA log.
//!
//! Every line starting with `$` is re-checksummed and forwarded; anything
//! else is skipped. GGA sentences are additionally field-parsed for
//! progress reporting and throttled to one per elapsed second, so the log
//! plays back as if it were arriving live over a serial link.

mod livekml;
mod pacer;

pub use livekml::LiveKml;
pub use pacer::Pacer;

use std::io::{self, BufRead, Write};

use crate::geo::{self, compass16};
use crate::nmea::seal;

pub struct Relay {
    pacer: Pacer,
    base: Option<BaseFix>,
    kml: Option<LiveKml>,
}

/// The first valid position in the log; later fixes are reported relative
/// to it.
struct BaseFix {
    seconds: f64,
    lat_deg: f64,
    lon_deg: f64,
}

struct Gga {
    seconds: f64,
    lat_deg: f64,
    lon_deg: f64,
    alt_m: f64,
}

impl Relay {
    pub fn new(kml: Option<LiveKml>) -> Self {
        Self {
            pacer: Pacer::new(),
            base: None,
            kml,
        }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if !line.starts_with('$') {
                continue; // not an NMEA sentence
            }

            let sealed = seal(&line);
            if sealed.starts_with("$GPGGA") {
                self.observe(&sealed);
                self.pacer.gate();
            }

            output.write_all(sealed.as_bytes())?;
            output.flush()?;
        }
        Ok(())
    }

    fn observe(&mut self, sentence: &str) {
        let Some(gga) = parse_gga(sentence) else {
            return;
        };
        if gga.lat_deg == 0.0 || gga.lon_deg == 0.0 {
            return; // no position lock yet
        }

        let base = self.base.get_or_insert_with(|| {
            log::info!("first fix at {:.4},{:.4}", gga.lat_deg, gga.lon_deg);
            BaseFix {
                seconds: gga.seconds,
                lat_deg: gga.lat_deg,
                lon_deg: gga.lon_deg,
            }
        });

        let vector =
            geo::bearing_and_distance(base.lat_deg, base.lon_deg, gga.lat_deg, gga.lon_deg);
        log::debug!(
            "t={:.0}s pos={:.4},{:.4} alt={:.0}m bearing={:.1} {} dist={:.1}km",
            gga.seconds - base.seconds,
            gga.lat_deg,
            gga.lon_deg,
            gga.alt_m,
            vector.course_deg,
            compass16(vector.course_deg),
            vector.distance_km
        );

        if let Some(kml) = &mut self.kml {
            kml.update(gga.lat_deg, gga.lon_deg, gga.alt_m, gga.seconds);
        }
    }
}

fn parse_gga(sentence: &str) -> Option<Gga> {
    let body = sentence.strip_prefix('$')?;
    let body = body.split('*').next().unwrap_or(body);
    let fields: Vec<&str> = body.split(',').collect();
    if fields.first() != Some(&"GPGGA") || fields.len() < 10 {
        return None;
    }
    Some(Gga {
        seconds: hms_to_seconds(fields[1])?,
        lat_deg: deg_min_to_deg(fields[2], fields[3], 2)?,
        lon_deg: deg_min_to_deg(fields[4], fields[5], 3)?,
        alt_m: fields[9].parse().ok()?,
    })
}

/// hhmmss.sss wall-clock field to decimal seconds since midnight.
fn hms_to_seconds(field: &str) -> Option<f64> {
    // reject non-ASCII up front so the byte slices below cannot land
    // inside a multibyte character
    if field.len() < 6 || !field.is_ascii() {
        return None;
    }
    let hours: f64 = field[..2].parse().ok()?;
    let minutes: f64 = field[2..4].parse().ok()?;
    let seconds: f64 = field[4..].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// ddmm.mmmm (or dddmm.mmmm) plus hemisphere letter to signed decimal
/// degrees.
fn deg_min_to_deg(field: &str, hemisphere: &str, deg_digits: usize) -> Option<f64> {
    if field.len() <= deg_digits || !field.is_ascii() {
        return None;
    }
    let degrees: f64 = field[..deg_digits].parse().ok()?;
    let minutes: f64 = field[deg_digits..].parse().ok()?;
    let value = degrees + minutes / 60.0;
    match hemisphere {
        "N" | "E" => Some(value),
        "S" | "W" => Some(-value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea::checksum;
    use std::time::Instant;

    #[test]
    fn bare_gga_lines_are_sealed_and_paced() {
        let input = "\
$GPGGA,120000.000,5130.0000,N,00007.5000,W,1,05,02.4,100.0,M,45.0,M,,
$GPGGA,120001.000,5130.0100,N,00007.5000,W,1,05,02.4,105.0,M,45.0,M,,
$GPGGA,120002.000,5130.0200,N,00007.5000,W,1,05,02.4,110.0,M,45.0,M,,
";
        let mut output = Vec::new();
        let before = Instant::now();
        Relay::new(None)
            .run(input.as_bytes(), &mut output)
            .unwrap();

        // one second per GGA from the first sentence on
        assert!(before.elapsed().as_secs_f64() >= 2.0);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let (payload, trailer) = line[1..].split_once('*').unwrap();
            assert_eq!(trailer, format!("{:02X}", checksum(payload)));
        }
    }

    #[test]
    fn non_sentences_are_dropped() {
        let input = "boot message\n$GPVTG,90.00,T,,,19.44,N,36.00,K,A\n# comment\n";
        let mut output = Vec::new();
        Relay::new(None)
            .run(input.as_bytes(), &mut output)
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("\r\n").count(), 1);
        assert!(text.starts_with("$GPVTG"));
        assert!(!text.contains("boot"));
    }

    #[test]
    fn gga_field_parsing() {
        let gga =
            parse_gga("$GPGGA,123456.000,3355.5000,S,01825.5000,E,1,05,02.4,42.0,M,45.0,M,,*00")
                .unwrap();
        assert!((gga.seconds - (12.0 * 3600.0 + 34.0 * 60.0 + 56.0)).abs() < 1e-9);
        assert!((gga.lat_deg + 33.925).abs() < 1e-9);
        assert!((gga.lon_deg - 18.425).abs() < 1e-9);
        assert_eq!(gga.alt_m, 42.0);
    }

    #[test]
    fn malformed_gga_is_ignored() {
        assert!(parse_gga("$GPGGA,,,,,,0,00,,,M,,M,,").is_none());
        assert!(parse_gga("$GPRMC,120000.000,A").is_none());
    }

    #[test]
    fn multibyte_fields_are_skipped_not_fatal() {
        // corrupt time field with a two-byte character straddling the
        // hour/minute split; the sentence must still be forwarded
        let input = "$GPGGA,aéaaa,5130.0000,N,00007.5000,W,1,05,02.4,100.0,M,45.0,M,,\n";
        let mut output = Vec::new();
        Relay::new(None)
            .run(input.as_bytes(), &mut output)
            .unwrap();
        assert!(String::from_utf8(output).unwrap().starts_with("$GPGGA"));

        assert!(parse_gga("$GPGGA,aéaaa,5130.0000,N,00007.5000,W,1,05,02.4,100.0,M,45.0,M,,")
            .is_none());
        assert!(deg_min_to_deg("5é30.0000", "N", 2).is_none());
    }

    #[test]
    fn midnight_fix_is_a_position_lock() {
        let gga =
            parse_gga("$GPGGA,000000.000,5130.0000,N,00007.5000,W,1,05,02.4,100.0,M,45.0,M,,")
                .unwrap();
        assert_eq!(gga.seconds, 0.0);

        // a midnight GGA with real coordinates still seeds the progress KML
        let path = std::env::temp_dir().join(format!("gps-sim-relay-{}.kml", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let input = "$GPGGA,000000.000,5130.0000,N,00007.5000,W,1,05,02.4,100.0,M,45.0,M,,\n";
        let mut output = Vec::new();
        Relay::new(Some(LiveKml::new(&path)))
            .run(input.as_bytes(), &mut output)
            .unwrap();
        let doc = std::fs::read_to_string(&path).unwrap();
        assert!(doc.contains("<name>Launch</name>"));
        std::fs::remove_file(&path).unwrap();
    }
}
