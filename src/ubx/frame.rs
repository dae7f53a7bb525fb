use chrono::{Datelike, Timelike};

use crate::flight::Sample;

/// Total size of a NAV-PVT frame: sync + class/id + length + payload +
/// checksum.
pub const FRAME_LEN: usize = 100;

const SYNC: [u8; 2] = [0xB5, 0x62];
const CLASS_NAV: u8 = 0x01;
const ID_PVT: u8 = 0x07;
const PAYLOAD_LEN: u16 = 92;
const RESERVED_FILL: u8 = 0xFA;

/// Order-preserving little-endian writer into a fixed frame buffer. The
/// layout is spelled out field by field rather than relying on struct
/// memory layout, so endianness and padding are pinned down.
struct FrameWriter {
    buf: [u8; FRAME_LEN],
    at: usize,
}

impl FrameWriter {
    fn new() -> Self {
        Self {
            buf: [0; FRAME_LEN],
            at: 0,
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.at + bytes.len();
        self.buf[self.at..end].copy_from_slice(bytes);
        self.at = end;
    }

    fn put_u8(&mut self, v: u8) {
        self.put(&[v]);
    }

    fn put_u16(&mut self, v: u16) {
        self.put(&v.to_le_bytes());
    }

    fn put_u32(&mut self, v: u32) {
        self.put(&v.to_le_bytes());
    }

    fn put_i32(&mut self, v: i32) {
        self.put(&v.to_le_bytes());
    }

    fn fill(&mut self, byte: u8, count: usize) {
        for _ in 0..count {
            self.put_u8(byte);
        }
    }
}

fn scaled(value: f64, factor: f64) -> i32 {
    (value * factor).round() as i32
}

/// Running two-accumulator sum over the class byte through the last payload
/// byte; the sync bytes and the trailing checksum bytes are excluded.
pub fn checksum(frame: &[u8]) -> (u8, u8) {
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;
    for &byte in &frame[2..frame.len() - 2] {
        ck_a = ck_a.wrapping_add(byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }
    (ck_a, ck_b)
}

/// Build one 100-byte UBX NAV-PVT frame for a sample.
///
/// Time of week is not modelled (fixed 0) and the accuracy fields carry
/// fixed placeholders; position, altitude, ground speed and heading come
/// from the sample. Longitude and latitude land in their documented NAV-PVT
/// fields.
pub fn nav_pvt(sample: &Sample) -> [u8; FRAME_LEN] {
    let t = sample.time;
    let heading = scaled(sample.course_deg, 1e5);
    let alt_mm = scaled(sample.alt_m, 1e3);

    let mut w = FrameWriter::new();
    w.put(&SYNC);
    w.put_u8(CLASS_NAV);
    w.put_u8(ID_PVT);
    w.put_u16(PAYLOAD_LEN);

    w.put_u32(0); // iTOW
    w.put_u16(t.year() as u16);
    w.put_u8(t.month() as u8);
    w.put_u8(t.day() as u8);
    w.put_u8(t.hour() as u8);
    w.put_u8(t.minute() as u8);
    w.put_u8(t.second() as u8);
    w.put_u8(0b0100_0111); // validDate | validTime | fullyResolved | validMag
    w.put_u32(0xFF); // tAcc placeholder
    w.put_i32(0xFF); // nano placeholder
    w.put_u8(0x03); // 3-D fix
    w.put_u8(0x03); // gnssFixOK | diffSoln
    w.put_u8(0x0A); // flags2
    w.put_u8(0x0B); // 11 satellites
    w.put_i32(scaled(sample.lon_deg, 1e7));
    w.put_i32(scaled(sample.lat_deg, 1e7));
    w.put_i32(alt_mm); // height above ellipsoid, mm
    w.put_i32(alt_mm); // hMSL; no geoid separation modelled
    w.put_u32(0); // hAcc
    w.put_u32(0); // vAcc
    w.put_i32(0); // velN
    w.put_i32(0); // velE
    w.put_i32(0); // velD
    w.put_i32(scaled(sample.speed_m_s, 1e3)); // gSpeed, mm/s
    w.put_i32(heading); // headMot
    w.put_u32(0xFD); // sAcc placeholder
    w.put_u32(0xFE); // headAcc placeholder
    w.put_u16(0xFF); // pDOP placeholder
    w.fill(RESERVED_FILL, 6);
    w.put_i32(heading); // headVeh, same as headMot
    w.fill(RESERVED_FILL, 4);

    debug_assert_eq!(w.at, FRAME_LEN - 2);
    let (ck_a, ck_b) = checksum(&w.buf);
    w.put_u8(ck_a);
    w.put_u8(ck_b);
    w.buf
}
