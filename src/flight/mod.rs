mod driver;
mod sample;
mod segment;
mod waypoint;

pub use driver::{fly, FixSink, FlightError};
pub use sample::Sample;
pub use segment::{Samples, Segment};
pub use waypoint::Waypoint;
