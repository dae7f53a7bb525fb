//! Coordinate extraction from a KML document.
//!
//! This is not an XML parser. The `<coordinates>` block of the first
//! `<LineString>` is located by scanning for its literal tokens, and the
//! lon,lat,alt triples inside are read word by word, exactly the contract a
//! hand-written KML exporter produces.

mod error;

pub use error::KmlError;

use std::collections::VecDeque;
use std::io::BufRead;

use crate::flight::Waypoint;

pub const LINESTRING_OPEN: &str = "<LineString>";
pub const COORDINATES_OPEN: &str = "<coordinates>";
pub const COORDINATES_CLOSE: &str = "</coordinates>";
pub const LINESTRING_CLOSE: &str = "</LineString>";

/// Pulls waypoints out of a KML document in source order.
pub struct CoordinateSource<R> {
    reader: R,
    words: VecDeque<String>,
}

impl<R: BufRead> CoordinateSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            words: VecDeque::new(),
        }
    }

    /// Scan forward to the start of the coordinate list.
    pub fn open(&mut self) -> Result<(), KmlError> {
        self.look_for(LINESTRING_OPEN)?;
        self.look_for(COORDINATES_OPEN)
    }

    /// Require the closing markers after the coordinate list.
    pub fn close(&mut self) -> Result<(), KmlError> {
        self.look_for(COORDINATES_CLOSE)?;
        self.look_for(LINESTRING_CLOSE)
    }

    /// The launch position. Unlike later reads, a missing or non-3D first
    /// coordinate is an error.
    pub fn first_waypoint(&mut self) -> Result<Waypoint, KmlError> {
        self.next_waypoint()?.ok_or(KmlError::FirstWaypoint)
    }

    /// The next lon,lat,alt triple, or `None` once the list ends. A triple
    /// may be a single comma-joined word or spread over several words.
    pub fn next_waypoint(&mut self) -> Result<Option<Waypoint>, KmlError> {
        let mut parts: Vec<f64> = Vec::with_capacity(3);

        while parts.len() < 3 {
            let Some(word) = self.next_word()? else {
                return Ok(None);
            };

            let mut coordinate = true;
            for piece in word.split(',').filter(|p| !p.is_empty()) {
                match piece.parse::<f64>() {
                    Ok(value) if parts.len() < 3 => parts.push(value),
                    _ => {
                        coordinate = false;
                        break;
                    }
                }
            }
            if !coordinate {
                // not part of a coordinate; leave it for close()
                self.words.push_front(word);
                return Ok(None);
            }
        }

        Ok(Some(Waypoint {
            lon_deg: parts[0],
            lat_deg: parts[1],
            alt_m: parts[2],
        }))
    }

    fn look_for(&mut self, token: &str) -> Result<(), KmlError> {
        while let Some(word) = self.next_word()? {
            if word == token {
                log::debug!("{} found", token);
                return Ok(());
            }
        }
        Err(KmlError::MarkerNotFound(token.to_string()))
    }

    fn next_word(&mut self) -> Result<Option<String>, KmlError> {
        loop {
            if let Some(word) = self.words.pop_front() {
                return Ok(Some(word));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.words
                .extend(line.split_whitespace().map(String::from));
        }
    }
}
