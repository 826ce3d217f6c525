pub mod gpio;

pub use gpio::GpioLed;
