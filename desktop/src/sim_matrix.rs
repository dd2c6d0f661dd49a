use std::cell::RefCell;
use std::rc::Rc;

use badapple_core::frame::{HEIGHT, WIDTH};
use badapple_core::gpio::{Delay, GpioPort, Level, PinId};
use badapple_core::scanner::PinMap;
use log::debug;

const CELL: usize = 48;
const GAP: usize = 5;
const WINDOW_WIDTH: usize = WIDTH * CELL;
const WINDOW_HEIGHT: usize = HEIGHT * CELL;

const LED_OFF: u32 = 0x10;
const LED_ON: u32 = 0xE8;

/// Shared electrical state of the simulated matrix.
///
/// The scanner drives it through [`SimPort`]; [`SimDelay`] integrates lit
/// time per LED during each dwell, so the duty cycle the human eye would
/// average becomes a brightness value.
struct MatrixState {
    pins: PinMap,
    row_levels: [Level; HEIGHT],
    col_levels: [Level; WIDTH],
    lit_us: [[u64; WIDTH]; HEIGHT],
    elapsed_us: u64,
}

impl MatrixState {
    fn new(pins: PinMap) -> Self {
        MatrixState {
            pins,
            row_levels: [Level::High; HEIGHT],
            col_levels: [Level::Low; WIDTH],
            lit_us: [[0; WIDTH]; HEIGHT],
            elapsed_us: 0,
        }
    }

    fn accumulate(&mut self, us: u32) {
        self.elapsed_us += us as u64;
        for row in 0..HEIGHT {
            // Rows are active-low.
            if self.row_levels[row] == Level::High {
                continue;
            }
            for col in 0..WIDTH {
                if self.col_levels[col].is_high() {
                    self.lit_us[row][col] += us as u64;
                }
            }
        }
    }
}

pub struct SimMatrix {
    state: Rc<RefCell<MatrixState>>,
    window: minifb::Window,
    buffer: Vec<u32>,
}

impl SimMatrix {
    pub fn new(pins: PinMap) -> Self {
        let options = minifb::WindowOptions {
            borderless: false,
            title: true,
            resize: true,
            scale: minifb::Scale::X1,
            ..minifb::WindowOptions::default()
        };
        let mut window =
            minifb::Window::new("Bad Apple 8x8", WINDOW_WIDTH, WINDOW_HEIGHT, options)
                .unwrap_or_else(|e| {
                    panic!("Unable to open window: {}", e);
                });
        window.set_target_fps(60);

        SimMatrix {
            state: Rc::new(RefCell::new(MatrixState::new(pins))),
            window,
            buffer: vec![0xFF000000; WINDOW_WIDTH * WINDOW_HEIGHT],
        }
    }

    pub fn port(&self) -> SimPort {
        SimPort(Rc::clone(&self.state))
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(Rc::clone(&self.state))
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }

    /// Render the duty cycle accumulated since the last present and reset
    /// the integrators.
    pub fn present(&mut self) {
        let mut colors = [[0u32; WIDTH]; HEIGHT];
        {
            let mut state = self.state.borrow_mut();
            let elapsed = state.elapsed_us.max(1);
            for row in 0..HEIGHT {
                for col in 0..WIDTH {
                    let duty = state.lit_us[row][col] as f64 / elapsed as f64;
                    // A fully lit LED is only on for 1/8 of the scan.
                    let level = (duty * HEIGHT as f64).min(1.0);
                    let gray = LED_OFF + ((LED_ON - LED_OFF) as f64 * level) as u32;
                    colors[row][col] = 0xFF000000 | gray << 16 | gray << 8 | gray;
                }
            }
            state.lit_us = [[0; WIDTH]; HEIGHT];
            state.elapsed_us = 0;
        }
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                self.draw_cell(col, row, colors[row][col]);
            }
        }
        self.window
            .update_with_buffer(&self.buffer, WINDOW_WIDTH, WINDOW_HEIGHT)
            .unwrap();
    }

    fn draw_cell(&mut self, col: usize, row: usize, color: u32) {
        for y in row * CELL + GAP..(row + 1) * CELL - GAP {
            for x in col * CELL + GAP..(col + 1) * CELL - GAP {
                self.buffer[y * WINDOW_WIDTH + x] = color;
            }
        }
    }
}

pub struct SimPort(Rc<RefCell<MatrixState>>);

impl GpioPort for SimPort {
    fn configure_output(&mut self, pin: PinId) {
        debug!("configured pin {} as output", pin);
    }

    fn write(&mut self, pin: PinId, level: Level) {
        let mut state = self.0.borrow_mut();
        if let Some(i) = state.pins.row_index(pin) {
            state.row_levels[i] = level;
        } else if let Some(i) = state.pins.col_index(pin) {
            state.col_levels[i] = level;
        }
    }
}

pub struct SimDelay(Rc<RefCell<MatrixState>>);

impl Delay for SimDelay {
    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().accumulate(us);
    }
}
