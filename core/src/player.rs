use log::info;

use crate::frame::Frame;
use crate::gpio::{Delay, GpioPort};
use crate::movie::Movie;
use crate::scanner::MatrixScanner;

/// Blocking playback driver.
///
/// Frame pacing is derived from the scan itself: one full pass takes
/// 8 × dwell microseconds, so holding a frame means rescanning it until the
/// display interval is covered. There is no other clock; the driver owns the
/// execution context for the whole run, as the hardware model requires.
pub struct Player<P: GpioPort, D: Delay> {
    scanner: MatrixScanner<P, D>,
}

impl<P: GpioPort, D: Delay> Player<P, D> {
    pub fn new(scanner: MatrixScanner<P, D>) -> Self {
        Player { scanner }
    }

    pub fn scanner_mut(&mut self) -> &mut MatrixScanner<P, D> {
        &mut self.scanner
    }

    /// Keep one frame on the matrix for at least `hold_us` by rescanning it.
    /// Always performs at least one pass.
    pub fn hold(&mut self, frame: &Frame, hold_us: u32) {
        let pass_us = self.scanner.scan_period_us().max(1);
        let passes = (hold_us / pass_us).max(1);
        for _ in 0..passes {
            self.scanner.display_frame(frame);
        }
    }

    /// Run one pass over a movie at its declared frame rate, then blank.
    pub fn play(&mut self, movie: &Movie<'_>) {
        info!(
            "playing {} frames at {} fps",
            movie.frame_count(),
            movie.fps()
        );
        let hold_us = movie.frame_duration_us();
        for frame in movie.frames() {
            self.hold(&frame, hold_us);
        }
        self.scanner.blank();
    }

    /// Play a raw frame sequence, e.g. the built-in test pattern.
    pub fn play_frames(&mut self, frames: &[Frame], fps: u16) {
        let hold_us = 1_000_000 / fps.max(1) as u32;
        for frame in frames {
            self.hold(frame, hold_us);
        }
        self.scanner.blank();
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::gpio::{Level, PinId};
    use crate::scanner::PinMap;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Default, Clone)]
    struct Counters {
        inner: Rc<RefCell<Counts>>,
    }

    #[derive(Default)]
    struct Counts {
        dwells: u32,
        dwell_us: u64,
        writes: Vec<(PinId, Level)>,
    }

    impl GpioPort for Counters {
        fn configure_output(&mut self, _pin: PinId) {}
        fn write(&mut self, pin: PinId, level: Level) {
            self.inner.borrow_mut().writes.push((pin, level));
        }
    }

    impl Delay for Counters {
        fn delay_us(&mut self, us: u32) {
            let mut counts = self.inner.borrow_mut();
            counts.dwells += 1;
            counts.dwell_us += us as u64;
        }
    }

    const PINS: PinMap = PinMap::new([0, 1, 2, 3, 4, 5, 6, 7], [10, 11, 12, 13, 14, 15, 16, 17]);

    fn player(dwell_us: u32) -> (Player<Counters, Counters>, Counters) {
        let counters = Counters::default();
        let scanner =
            MatrixScanner::with_dwell(counters.clone(), counters.clone(), PINS, dwell_us);
        (Player::new(scanner), counters)
    }

    #[test]
    fn hold_rescans_until_interval_covered() {
        // 50 µs dwell -> 400 µs per pass; a 1000 µs hold needs 2 passes.
        let (mut player, counters) = player(50);
        player.hold(&Frame::default(), 1000);
        assert_eq!(counters.inner.borrow().dwells, 16);
        assert_eq!(counters.inner.borrow().dwell_us, 800);
    }

    #[test]
    fn hold_always_scans_at_least_once() {
        let (mut player, counters) = player(50);
        player.hold(&Frame::default(), 0);
        assert_eq!(counters.inner.borrow().dwells, 8);
    }

    #[test]
    fn play_covers_every_frame_and_blanks() {
        let frames = [
            Frame::new([0xFF, 0, 0, 0, 0, 0, 0, 0]),
            Frame::new([0, 0, 0, 0, 0, 0, 0, 0xFF]),
        ];
        // 25 fps -> 40_000 µs per frame -> 100 passes at 400 µs.
        let bytes = Movie::encode(&frames, 25);
        let movie = Movie::from_bytes(&bytes).unwrap();

        let (mut player, counters) = player(50);
        player.play(&movie);

        let counts = counters.inner.borrow();
        assert_eq!(counts.dwells, 2 * 100 * 8);
        // Playback ends blanked: final 16 writes are rows high, cols low.
        let tail = &counts.writes[counts.writes.len() - 16..];
        for i in 0..8 {
            assert_eq!(tail[2 * i], (PINS.rows[i], Level::High));
            assert_eq!(tail[2 * i + 1], (PINS.cols[i], Level::Low));
        }
    }

    #[test]
    fn play_frames_paces_by_fps() {
        let frames = [Frame::default(); 4];
        let (mut player, counters) = player(100);
        // 10 fps -> 100_000 µs per frame; 800 µs per pass -> 125 passes.
        player.play_frames(&frames, 10);
        assert_eq!(counters.inner.borrow().dwells, 4 * 125 * 8);
    }
}
