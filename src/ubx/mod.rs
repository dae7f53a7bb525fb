mod frame;
mod sink;

pub use frame::{checksum, nav_pvt, FRAME_LEN};
pub use sink::UbxSink;
