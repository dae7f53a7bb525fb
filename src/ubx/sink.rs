use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use super::frame::nav_pvt;
use crate::flight::{FixSink, Sample};

/// Appends each encoded frame to the output file, reopening it per frame so
/// an interrupted write never disturbs frames already on disk.
pub struct UbxSink {
    path: PathBuf,
    frames: u64,
}

impl UbxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frames: 0,
        }
    }
}

impl FixSink for UbxSink {
    fn emit(&mut self, sample: &Sample) -> io::Result<()> {
        let frame = nav_pvt(sample);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&frame)?;
        self.frames += 1;
        log::trace!("frame {} appended to {}", self.frames, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ubx::frame::FRAME_LEN;
    use chrono::{TimeZone, Utc};
    use std::fs;

    #[test]
    fn frames_accumulate_on_disk() {
        let path = std::env::temp_dir().join(format!("gps-sim-sink-{}.bin", std::process::id()));
        let _ = fs::remove_file(&path);

        let sample = Sample {
            time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
            lat_deg: 1.0,
            lon_deg: 2.0,
            alt_m: 3.0,
            course_deg: 4.0,
            speed_m_s: 5.0,
        };

        let mut sink = UbxSink::new(&path);
        sink.emit(&sample).unwrap();
        sink.emit(&sample).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), 2 * FRAME_LEN);
        // second frame starts with its own sync bytes
        assert_eq!(&bytes[FRAME_LEN..FRAME_LEN + 2], &[0xB5, 0x62]);

        fs::remove_file(&path).unwrap();
    }
}
