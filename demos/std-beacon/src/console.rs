use core::convert::Infallible;
use drogue_beacon::domain::ibeacon::AdvertisementFrame;
use drogue_beacon::traits::led::Led;
use drogue_beacon::traits::radio::{
    advertising_data, AdvertisingParameters, BeaconRadio, StackEvent, StackObserver, TxPower,
};

/// A radio stack that prints what it would put on the air.
pub struct ConsoleRadio<O>
where
    O: StackObserver,
{
    observer: O,
    company_identifier: u16,
}

impl<O> ConsoleRadio<O>
where
    O: StackObserver,
{
    pub const ADDRESS: [u8; 6] = [0x3a, 0x41, 0x9e, 0x10, 0xc5, 0xd2];

    pub fn new(observer: O, company_identifier: u16) -> Self {
        Self {
            observer,
            company_identifier,
        }
    }
}

impl<O> BeaconRadio for ConsoleRadio<O>
where
    O: StackObserver,
{
    type Error = Infallible;

    fn configure(&mut self, tx_power: TxPower) -> Result<(), Infallible> {
        log::info!("[radio] tx power {} dBm", tx_power.dbm());
        self.observer.on_stack_event(StackEvent::Enabled);
        Ok(())
    }

    fn address(&mut self) -> Result<[u8; 6], Infallible> {
        Ok(Self::ADDRESS)
    }

    fn set_advertisement_data(&mut self, frame: &AdvertisementFrame) -> Result<(), Infallible> {
        let data = advertising_data(self.company_identifier, frame);
        log::info!("[radio] advertising data {:02x?}", &data[..]);
        Ok(())
    }

    fn start(&mut self, parameters: &AdvertisingParameters) -> Result<(), Infallible> {
        log::info!(
            "[radio] advertising every {} ms ({} units), {:?}",
            parameters.interval.as_millis(),
            parameters.interval_units(),
            parameters.kind
        );
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Infallible> {
        log::info!("[radio] advertising stopped");
        Ok(())
    }
}

#[derive(Default)]
pub struct ConsoleLed {
    on: bool,
}

impl Led for ConsoleLed {
    type Error = Infallible;

    fn set(&mut self, on: bool) -> Result<(), Infallible> {
        if on != self.on {
            log::info!("[led] {}", if on { "on" } else { "off" });
        }
        self.on = on;
        Ok(())
    }

    fn state(&self) -> Result<bool, Infallible> {
        Ok(self.on)
    }
}
