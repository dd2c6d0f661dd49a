use log::{debug, info};

use crate::frame::{Frame, HEIGHT, WIDTH};
use crate::gpio::{Delay, GpioPort, Level, PinId};

/// Row dwell used by the original wiring. Short enough for a ~2.5 kHz
/// full-frame refresh, long enough for the driving transistors to settle.
pub const DEFAULT_DWELL_US: u32 = 50;

/// Immutable pin assignment for the matrix. Index corresponds to row/column
/// number. Row and column pins must not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub rows: [PinId; HEIGHT],
    pub cols: [PinId; WIDTH],
}

impl PinMap {
    /// The wiring of the original build. GPIO 34/35 are input-only on the
    /// ESP32, so firmware substitutes them; kept here as the reference map.
    pub const ESP32_BAD_APPLE: PinMap = PinMap {
        rows: [34, 35, 32, 33, 25, 26, 27, 14],
        cols: [12, 13, 23, 22, 21, 19, 18, 5],
    };

    pub const fn new(rows: [PinId; HEIGHT], cols: [PinId; WIDTH]) -> Self {
        PinMap { rows, cols }
    }

    pub fn is_disjoint(&self) -> bool {
        self.rows.iter().all(|r| !self.cols.contains(r))
    }

    pub fn row_index(&self, pin: PinId) -> Option<usize> {
        self.rows.iter().position(|&p| p == pin)
    }

    pub fn col_index(&self, pin: PinId) -> Option<usize> {
        self.cols.iter().position(|&p| p == pin)
    }
}

/// Multiplexing row scanner.
///
/// Renders a [`Frame`] by activating one row at a time: blank everything,
/// set the column levels for the row, pull the row low, hold for the dwell
/// interval, move on. Rows are active-low, columns active-high; both are
/// fixed by the wiring. The whole scan blocks until all 8 rows are done.
pub struct MatrixScanner<P: GpioPort, D: Delay> {
    port: P,
    delay: D,
    pins: PinMap,
    dwell_us: u32,
}

impl<P: GpioPort, D: Delay> MatrixScanner<P, D> {
    pub fn new(port: P, delay: D, pins: PinMap) -> Self {
        Self::with_dwell(port, delay, pins, DEFAULT_DWELL_US)
    }

    pub fn with_dwell(port: P, delay: D, pins: PinMap, dwell_us: u32) -> Self {
        debug_assert!(pins.is_disjoint(), "row and column pins overlap");
        MatrixScanner {
            port,
            delay,
            pins,
            dwell_us,
        }
    }

    pub fn pins(&self) -> &PinMap {
        &self.pins
    }

    pub fn dwell_us(&self) -> u32 {
        self.dwell_us
    }

    /// Duration of one full 8-row scan pass.
    pub fn scan_period_us(&self) -> u32 {
        self.dwell_us * HEIGHT as u32
    }

    /// Configure all 16 pins as outputs and blank the matrix. Call once at
    /// startup, before the first scan.
    pub fn init(&mut self) {
        for i in 0..HEIGHT {
            self.port.configure_output(self.pins.rows[i]);
            self.port.configure_output(self.pins.cols[i]);
            debug!(
                "configured row pin {} and col pin {}",
                self.pins.rows[i], self.pins.cols[i]
            );
        }
        self.blank();
        info!("matrix pins configured");
    }

    /// Drive every row high and every column low, turning all LEDs off.
    pub fn blank(&mut self) {
        for i in 0..HEIGHT {
            self.port.write(self.pins.rows[i], Level::High);
            self.port.write(self.pins.cols[i], Level::Low);
        }
    }

    /// Render one frame with a single multiplexed scan pass.
    ///
    /// Blanking before the column set is mandatory: it guarantees no column
    /// is lit under the wrong row during the transition, which would show as
    /// ghost pixels.
    pub fn display_frame(&mut self, frame: &Frame) {
        for row in 0..HEIGHT {
            self.blank();

            let bits = frame.row(row);
            for col in 0..WIDTH {
                let level = if (bits >> (7 - col)) & 1 == 1 {
                    Level::High
                } else {
                    Level::Low
                };
                self.port.write(self.pins.cols[col], level);
            }

            self.port.write(self.pins.rows[row], Level::Low);

            self.delay.delay_us(self.dwell_us);
        }
    }

    /// Diagnostic walk: light every pixel individually for 200 ms. Useful
    /// for verifying the wiring against the pin map.
    pub fn pin_test(&mut self) {
        info!("testing individual pixels");
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                self.blank();
                self.port.write(self.pins.cols[col], Level::High);
                self.port.write(self.pins.rows[row], Level::Low);
                info!(
                    "testing row {} (pin {}), col {} (pin {})",
                    row, self.pins.rows[row], col, self.pins.cols[col]
                );
                self.delay.delay_ms(200);
            }
        }
        self.blank();
        info!("pin test complete");
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Configure(PinId),
        Write(PinId, Level),
        Dwell(u32),
    }

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl Recorder {
        fn tap(&self) -> Rc<RefCell<Vec<Event>>> {
            Rc::clone(&self.events)
        }
    }

    struct RecordingPort(Rc<RefCell<Vec<Event>>>);
    struct RecordingDelay(Rc<RefCell<Vec<Event>>>);

    impl GpioPort for RecordingPort {
        fn configure_output(&mut self, pin: PinId) {
            self.0.borrow_mut().push(Event::Configure(pin));
        }
        fn write(&mut self, pin: PinId, level: Level) {
            self.0.borrow_mut().push(Event::Write(pin, level));
        }
    }

    impl Delay for RecordingDelay {
        fn delay_us(&mut self, us: u32) {
            self.0.borrow_mut().push(Event::Dwell(us));
        }
    }

    const PINS: PinMap = PinMap::new([0, 1, 2, 3, 4, 5, 6, 7], [10, 11, 12, 13, 14, 15, 16, 17]);

    fn scanner() -> (MatrixScanner<RecordingPort, RecordingDelay>, Rc<RefCell<Vec<Event>>>) {
        let recorder = Recorder::default();
        let tap = recorder.tap();
        let scanner = MatrixScanner::new(
            RecordingPort(recorder.tap()),
            RecordingDelay(recorder.tap()),
            PINS,
        );
        (scanner, tap)
    }

    /// Writes of one row's scan cycle: 16 blank, 8 column set, 1 activate,
    /// then the dwell event.
    const ROW_CYCLE: usize = 16 + 8 + 1 + 1;

    #[test]
    fn scan_visits_every_row_once_in_order() {
        let (mut scanner, tap) = scanner();
        scanner.display_frame(&Frame::default());

        let events = tap.borrow();
        assert_eq!(events.len(), 8 * ROW_CYCLE);
        for (row, cycle) in events.chunks(ROW_CYCLE).enumerate() {
            // Blank phase strictly precedes the set phase.
            for i in 0..8 {
                assert_eq!(cycle[2 * i], Event::Write(PINS.rows[i], Level::High));
                assert_eq!(cycle[2 * i + 1], Event::Write(PINS.cols[i], Level::Low));
            }
            // Activation targets this row and nothing else.
            assert_eq!(cycle[24], Event::Write(PINS.rows[row], Level::Low));
            assert_eq!(cycle[25], Event::Dwell(DEFAULT_DWELL_US));
        }
    }

    #[test]
    fn column_levels_follow_row_byte() {
        let (mut scanner, tap) = scanner();
        scanner.display_frame(&Frame::new([0b1000_0001, 0, 0, 0, 0, 0, 0, 0]));

        let events = tap.borrow();
        let set_phase = &events[16..24];
        assert_eq!(set_phase[0], Event::Write(PINS.cols[0], Level::High));
        assert_eq!(set_phase[7], Event::Write(PINS.cols[7], Level::High));
        for col in 1..7 {
            assert_eq!(set_phase[col], Event::Write(PINS.cols[col], Level::Low));
        }
    }

    #[test]
    fn exactly_one_row_low_during_each_dwell() {
        let (mut scanner, tap) = scanner();
        scanner.display_frame(&Frame::new([0xFF; 8]));

        let mut row_levels = [Level::High; 8];
        for event in tap.borrow().iter() {
            match *event {
                Event::Write(pin, level) => {
                    if let Some(i) = PINS.row_index(pin) {
                        row_levels[i] = level;
                    }
                }
                Event::Dwell(_) => {
                    let low = row_levels.iter().filter(|&&l| l == Level::Low).count();
                    assert_eq!(low, 1);
                }
                Event::Configure(_) => {}
            }
        }
    }

    #[test]
    fn identical_frames_produce_identical_write_sequences() {
        let frame = Frame::new([0xA5, 0x5A, 0xFF, 0x00, 0x81, 0x18, 0x3C, 0xC3]);
        let (mut scanner, tap) = scanner();
        scanner.display_frame(&frame);
        let first: Vec<Event> = tap.borrow().clone();
        tap.borrow_mut().clear();
        scanner.display_frame(&frame);
        assert_eq!(*tap.borrow(), first);
    }

    #[test]
    fn top_row_lit_scenario() {
        // frame = [0xFF, 0, ..] lights all of row 0, nothing else.
        let (mut scanner, tap) = scanner();
        scanner.display_frame(&Frame::new([0xFF, 0, 0, 0, 0, 0, 0, 0]));

        let events = tap.borrow();
        let mut total_dwell = 0u32;
        for (row, cycle) in events.chunks(ROW_CYCLE).enumerate() {
            let expected = if row == 0 { Level::High } else { Level::Low };
            for col in 0..8 {
                assert_eq!(cycle[16 + col], Event::Write(PINS.cols[col], expected));
            }
            if let Event::Dwell(us) = cycle[25] {
                total_dwell += us;
            }
        }
        assert_eq!(total_dwell, 400);
    }

    #[test]
    fn custom_dwell_is_honored() {
        let recorder = Recorder::default();
        let tap = recorder.tap();
        let mut scanner = MatrixScanner::with_dwell(
            RecordingPort(recorder.tap()),
            RecordingDelay(recorder.tap()),
            PINS,
            125,
        );
        assert_eq!(scanner.scan_period_us(), 1000);
        scanner.display_frame(&Frame::default());
        let dwells = tap
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Dwell(125)))
            .count();
        assert_eq!(dwells, 8);
    }

    #[test]
    fn init_configures_all_pins_then_blanks() {
        let (mut scanner, tap) = scanner();
        scanner.init();

        let events = tap.borrow();
        let configured = events
            .iter()
            .filter(|e| matches!(e, Event::Configure(_)))
            .count();
        assert_eq!(configured, 16);
        // Everything after configuration is the blanking pass.
        let writes: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, Event::Write(..)))
            .collect();
        assert_eq!(writes.len(), 16);
        for i in 0..8 {
            assert_eq!(*writes[2 * i], Event::Write(PINS.rows[i], Level::High));
            assert_eq!(*writes[2 * i + 1], Event::Write(PINS.cols[i], Level::Low));
        }
    }

    #[test]
    fn reference_map_is_disjoint() {
        assert!(PinMap::ESP32_BAD_APPLE.is_disjoint());
    }
}
