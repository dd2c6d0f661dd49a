/// Hardware pin identifier. On the ESP32 this is the GPIO number.
pub type PinId = u8;

/// Digital output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

/// Capability interface over the platform's GPIO driver.
///
/// Writes are infallible: the scan path runs thousands of times per second
/// and the underlying hardware write cannot report failure anyway.
pub trait GpioPort {
    fn configure_output(&mut self, pin: PinId);
    fn write(&mut self, pin: PinId, level: Level);
}

/// Injectable timing primitive for the row dwell.
///
/// Implementations block for at least the requested interval. Simulators may
/// account for virtual time instead of sleeping.
pub trait Delay {
    fn delay_us(&mut self, us: u32);

    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms * 1000);
    }
}
