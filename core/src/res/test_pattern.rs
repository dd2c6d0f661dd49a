//! Built-in frames for bring-up without external movie data.

use crate::frame::Frame;

pub const SWEEP_FPS: u16 = 8;

/// One lit row walking top to bottom. Scanning this with the real pin map
/// exercises every row/column driver.
pub const ROW_SWEEP: [Frame; 8] = [
    Frame::new([0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    Frame::new([0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    Frame::new([0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00]),
    Frame::new([0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x00]),
    Frame::new([0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00]),
    Frame::new([0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00]),
    Frame::new([0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00]),
    Frame::new([0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF]),
];

pub const HEART: Frame = Frame::new([
    0b0110_0110,
    0b1111_1111,
    0b1111_1111,
    0b1111_1111,
    0b0111_1110,
    0b0011_1100,
    0b0001_1000,
    0b0000_0000,
]);
