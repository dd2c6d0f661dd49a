use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Size},
};

pub const WIDTH: usize = 8;
pub const HEIGHT: usize = 8;
pub const FRAME_SIZE: usize = 8;

/// One 8×8 monochrome bitmap: one byte per row (top to bottom), one bit per
/// column with the most significant bit as column 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame([u8; FRAME_SIZE]);

impl Frame {
    pub const fn new(rows: [u8; FRAME_SIZE]) -> Self {
        Frame(rows)
    }

    /// Checked construction from a byte slice. Anything but exactly 8 bytes
    /// is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let rows: [u8; FRAME_SIZE] = bytes.try_into().ok()?;
        Some(Frame(rows))
    }

    pub const fn row(&self, row: usize) -> u8 {
        self.0[row]
    }

    pub fn rows(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }

    pub fn pixel(&self, col: usize, row: usize) -> bool {
        (self.0[row] >> (7 - col)) & 1 == 1
    }

    pub fn set_pixel(&mut self, col: usize, row: usize, on: bool) {
        if col >= WIDTH || row >= HEIGHT {
            return;
        }
        if on {
            self.0[row] |= 1 << (7 - col);
        } else {
            self.0[row] &= !(1 << (7 - col));
        }
    }

    pub fn clear(&mut self) {
        self.0 = [0; FRAME_SIZE];
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 {
                continue;
            }
            self.set_pixel(coord.x as usize, coord.y as usize, color == BinaryColor::On);
        }
        Ok(())
    }
}
