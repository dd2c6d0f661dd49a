use log::info;
use zerocopy::FromBytes;

use crate::frame::{FRAME_SIZE, Frame, HEIGHT, WIDTH};

const MOVIE_MAGIC: &[u8; 4] = b"BAM1";

pub const HEADER_SIZE: usize = core::mem::size_of::<MovieHeader>();

/// Container header, 12 bytes, fields little-endian (native on every
/// supported target); followed by `frame_count` frames of 8 bytes each in
/// playback order.
#[repr(C, packed)]
#[derive(zerocopy::FromBytes, zerocopy::IntoBytes, zerocopy::Immutable, Clone, Copy)]
pub struct MovieHeader {
    pub magic: [u8; 4],
    pub frame_count: u32,
    pub fps: u16,
    pub width: u8,
    pub height: u8,
}

impl MovieHeader {
    fn validate(&self) -> Result<()> {
        if { self.magic } != *MOVIE_MAGIC {
            return Err(MovieError::InvalidSignature);
        }
        if self.width as usize != WIDTH || self.height as usize != HEIGHT {
            return Err(MovieError::UnsupportedSize);
        }
        if self.fps == 0 {
            return Err(MovieError::InvalidData);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieError {
    InvalidSignature,
    InvalidData,
    UnsupportedSize,
    Io(embedded_io::ErrorKind),
}

impl MovieError {
    fn from_io(err: impl embedded_io::Error) -> Self {
        MovieError::Io(err.kind())
    }

    fn from_read_exact<E: embedded_io::Error>(err: embedded_io::ReadExactError<E>) -> Self {
        match err {
            embedded_io::ReadExactError::UnexpectedEof => MovieError::InvalidData,
            embedded_io::ReadExactError::Other(e) => MovieError::from_io(e),
        }
    }
}

type Result<T> = core::result::Result<T, MovieError>;

/// Borrowed view over a complete container, e.g. an `include_bytes!` asset.
pub struct Movie<'a> {
    header: MovieHeader,
    data: &'a [u8],
}

impl<'a> Movie<'a> {
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        let (header, rest) =
            MovieHeader::read_from_prefix(bytes).map_err(|_| MovieError::InvalidData)?;
        header.validate()?;
        let (count, fps) = (header.frame_count, header.fps);
        let payload = count as usize * FRAME_SIZE;
        if rest.len() < payload {
            return Err(MovieError::InvalidData);
        }
        info!("parsed movie: {} frames at {} fps", count, fps);
        Ok(Movie {
            header,
            data: &rest[..payload],
        })
    }

    pub fn frame_count(&self) -> u32 {
        self.header.frame_count
    }

    pub fn fps(&self) -> u16 {
        self.header.fps
    }

    /// How long each frame should stay on screen.
    pub fn frame_duration_us(&self) -> u32 {
        1_000_000 / self.header.fps as u32
    }

    pub fn frame(&self, index: u32) -> Option<Frame> {
        let start = index as usize * FRAME_SIZE;
        let bytes = self.data.get(start..start + FRAME_SIZE)?;
        Frame::from_bytes(bytes)
    }

    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        self.data
            .chunks_exact(FRAME_SIZE)
            .map(|chunk| Frame::from_bytes(chunk).unwrap())
    }

    /// Serialize frames into a fresh container.
    pub fn encode(frames: &[Frame], fps: u16) -> alloc::vec::Vec<u8> {
        let header = MovieHeader {
            magic: *MOVIE_MAGIC,
            frame_count: frames.len() as u32,
            fps,
            width: WIDTH as u8,
            height: HEIGHT as u8,
        };
        let mut out = alloc::vec::Vec::with_capacity(HEADER_SIZE + frames.len() * FRAME_SIZE);
        out.extend_from_slice(zerocopy::IntoBytes::as_bytes(&header));
        for frame in frames {
            out.extend_from_slice(frame.rows());
        }
        out
    }
}

/// Streaming reader for file-backed sources. Pulls one frame at a time so
/// playback never needs the whole container in memory.
pub struct MovieReader<R> {
    reader: R,
    header: MovieHeader,
    read: u32,
}

impl<R: embedded_io::Read> MovieReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut buf)
            .map_err(MovieError::from_read_exact)?;
        let header = MovieHeader::read_from_bytes(&buf).map_err(|_| MovieError::InvalidData)?;
        header.validate()?;
        let (count, fps) = (header.frame_count, header.fps);
        info!("streaming movie: {} frames at {} fps", count, fps);
        Ok(MovieReader {
            reader,
            header,
            read: 0,
        })
    }

    pub fn frame_count(&self) -> u32 {
        self.header.frame_count
    }

    pub fn fps(&self) -> u16 {
        self.header.fps
    }

    pub fn frame_duration_us(&self) -> u32 {
        1_000_000 / self.header.fps as u32
    }

    /// Next frame in playback order, or `None` once the count declared in
    /// the header is exhausted.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.read >= self.header.frame_count {
            return Ok(None);
        }
        let mut bytes = [0u8; FRAME_SIZE];
        self.reader
            .read_exact(&mut bytes)
            .map_err(MovieError::from_read_exact)?;
        self.read += 1;
        Ok(Some(Frame::new(bytes)))
    }
}
