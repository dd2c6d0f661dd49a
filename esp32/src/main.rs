#![no_std]
#![no_main]

use badapple_core::gpio::{Delay as MatrixDelay, GpioPort, Level, PinId};
use badapple_core::player::Player;
use badapple_core::res::test_pattern::{HEART, ROW_SWEEP, SWEEP_FPS};
use badapple_core::scanner::{MatrixScanner, PinMap};
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Level as HalLevel, Output, OutputConfig};
use log::info;

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

// GPIO 34/35 from the original wiring are input-only on the ESP32; rows 0
// and 1 run on GPIO 4 and 15 instead.
const PINS: PinMap = PinMap::new(
    [4, 15, 32, 33, 25, 26, 27, 14],
    [12, 13, 23, 22, 21, 19, 18, 5],
);

struct EspPort {
    pins: [(PinId, Output<'static>); 16],
}

impl GpioPort for EspPort {
    fn configure_output(&mut self, _pin: PinId) {
        // Pins are configured as outputs at construction.
    }

    fn write(&mut self, pin: PinId, level: Level) {
        if let Some((_, output)) = self.pins.iter_mut().find(|(id, _)| *id == pin) {
            output.set_level(match level {
                Level::High => HalLevel::High,
                Level::Low => HalLevel::Low,
            });
        }
    }
}

struct EspDelay(Delay);

impl MatrixDelay for EspDelay {
    fn delay_us(&mut self, us: u32) {
        self.0.delay_micros(us);
    }
}

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("starting led matrix");

    // Rows idle high (inactive), columns idle low.
    let pins: [(PinId, Output<'static>); 16] = [
        (4, Output::new(peripherals.GPIO4, HalLevel::High, OutputConfig::default())),
        (15, Output::new(peripherals.GPIO15, HalLevel::High, OutputConfig::default())),
        (32, Output::new(peripherals.GPIO32, HalLevel::High, OutputConfig::default())),
        (33, Output::new(peripherals.GPIO33, HalLevel::High, OutputConfig::default())),
        (25, Output::new(peripherals.GPIO25, HalLevel::High, OutputConfig::default())),
        (26, Output::new(peripherals.GPIO26, HalLevel::High, OutputConfig::default())),
        (27, Output::new(peripherals.GPIO27, HalLevel::High, OutputConfig::default())),
        (14, Output::new(peripherals.GPIO14, HalLevel::High, OutputConfig::default())),
        (12, Output::new(peripherals.GPIO12, HalLevel::Low, OutputConfig::default())),
        (13, Output::new(peripherals.GPIO13, HalLevel::Low, OutputConfig::default())),
        (23, Output::new(peripherals.GPIO23, HalLevel::Low, OutputConfig::default())),
        (22, Output::new(peripherals.GPIO22, HalLevel::Low, OutputConfig::default())),
        (21, Output::new(peripherals.GPIO21, HalLevel::Low, OutputConfig::default())),
        (19, Output::new(peripherals.GPIO19, HalLevel::Low, OutputConfig::default())),
        (18, Output::new(peripherals.GPIO18, HalLevel::Low, OutputConfig::default())),
        (5, Output::new(peripherals.GPIO5, HalLevel::Low, OutputConfig::default())),
    ];

    let mut scanner = MatrixScanner::new(EspPort { pins }, EspDelay(Delay::new()), PINS);
    scanner.init();
    scanner.pin_test();

    info!("pin test complete, starting playback");
    let mut player = Player::new(scanner);
    loop {
        player.play_frames(&ROW_SWEEP, SWEEP_FPS);
        player.hold(&HEART, 1_000_000);
    }
}
