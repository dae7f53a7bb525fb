use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Minimum spacing, in log seconds, between file refreshes.
const UPDATE_INTERVAL_S: f64 = 20.0;

/// Maintains a "where is it now" KML document alongside the relay: a launch
/// placemark at the first fix, the track flown so far, and a current
/// position placemark. The document is rewritten in full on each refresh
/// rather than patched in place.
pub struct LiveKml {
    path: PathBuf,
    track: Vec<(f64, f64, f64)>, // lon, lat, alt
    next_due_s: f64,
}

impl LiveKml {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            track: Vec::new(),
            next_due_s: 0.0,
        }
    }

    /// Record a fix. The file refreshes at most every 20 log-seconds; a
    /// failed write is retried at the next refresh.
    pub fn update(&mut self, lat_deg: f64, lon_deg: f64, alt_m: f64, log_seconds: f64) {
        if !self.track.is_empty() && log_seconds < self.next_due_s {
            return;
        }
        self.next_due_s = log_seconds + UPDATE_INTERVAL_S;
        self.track.push((lon_deg, lat_deg, alt_m));

        if let Err(e) = self.write() {
            log::warn!("live KML update failed: {}", e);
        }
    }

    fn write(&self) -> io::Result<()> {
        let mut doc = String::new();
        doc.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        doc.push_str("<kml xmlns=\"http://earth.google.com/kml/2.1\">\n<Document>\n");
        doc.push_str("<Style id=\"track\">\n");
        doc.push_str("<LineStyle> <color>fff010c0</color> </LineStyle>\n");
        doc.push_str("<PolyStyle> <color>3fc00880</color> </PolyStyle>\n</Style>\n");
        doc.push_str("<Style id=\"place\">\n");
        doc.push_str(
            "<IconStyle> <scale>1</scale> <Icon> <href>http://weather.uwyo.edu/icons/purple.gif</href> </Icon> </IconStyle>\n</Style>\n",
        );

        if let Some(&(lon, lat, alt)) = self.track.first() {
            placemark(&mut doc, "Launch", lon, lat, alt);

            doc.push_str("<Placemark> <name>Flight Path</name> <styleUrl>#track</styleUrl>\n");
            doc.push_str("<LineString> <extrude>1</extrude> <altitudeMode>absolute</altitudeMode>\n");
            doc.push_str("<coordinates>\n");
            for &(lon, lat, alt) in &self.track {
                let _ = writeln!(doc, "{:.6},{:.6},{:.6}", lon, lat, alt);
            }
            doc.push_str("</coordinates>\n</LineString>\n</Placemark>\n");
        }
        if let Some(&(lon, lat, alt)) = self.track.last() {
            if self.track.len() > 1 {
                placemark(&mut doc, "Position Now", lon, lat, alt);
            }
        }

        doc.push_str("</Document>\n</kml>\n");
        fs::write(&self.path, doc)
    }
}

fn placemark(doc: &mut String, name: &str, lon: f64, lat: f64, alt: f64) {
    let _ = writeln!(
        doc,
        "<Placemark> <name>{}</name> <styleUrl>#place</styleUrl>\n\
         <Point> <altitudeMode>absolute</altitudeMode>\n\
         <coordinates>{:.6},{:.6},{:.6}</coordinates>\n\
         </Point>\n</Placemark>",
        name, lon, lat, alt
    );
}
