mod checksum;
mod encoder;

pub use checksum::{checksum, seal, sentence};
pub use encoder::NmeaEncoder;
