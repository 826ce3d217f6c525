use super::super::{ActiveHigh, ActiveLevel};
use crate::traits::led::Led;
use core::marker::PhantomData;
use embedded_hal::digital::OutputPin;

pub struct GpioLed<P, L = ActiveHigh>
where
    P: OutputPin,
    L: ActiveLevel,
{
    pin: P,
    state: bool,
    _active: PhantomData<L>,
}

impl<P, L> GpioLed<P, L>
where
    P: OutputPin,
    L: ActiveLevel,
{
    /// The pin is expected to be configured with the LED turned off.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: false,
            _active: PhantomData,
        }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P, L> Led for GpioLed<P, L>
where
    P: OutputPin,
    L: ActiveLevel,
{
    type Error = P::Error;

    fn set(&mut self, on: bool) -> Result<(), Self::Error> {
        match L::level(on) {
            true => self.pin.set_high(),
            false => self.pin.set_low(),
        }?;
        self.state = on;
        Ok(())
    }

    fn state(&self) -> Result<bool, Self::Error> {
        Ok(self.state)
    }
}

impl<P> From<P> for GpioLed<P, ActiveHigh>
where
    P: OutputPin,
{
    fn from(pin: P) -> Self {
        Self::new(pin)
    }
}
