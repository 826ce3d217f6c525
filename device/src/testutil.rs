//! Test doubles for driving the beacon on a host.

use crate::actors::beacon::RadioCommand;
use crate::domain::ibeacon::AdvertisementFrame;
use crate::traits::led::Led;
use crate::traits::radio::{AdvertisingParameters, BeaconRadio, TxPower};
use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_async::digital::Wait;
use std::cell::RefCell;
use std::rc::Rc;

/// A Pin that implements the embedded-hal traits and can be used to drive
/// device changes. Copies share the same level.
pub struct TestPin {
    inner: &'static InnerPin,
}

struct InnerPin {
    value: AtomicBool,
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl Copy for TestPin {}
impl Clone for TestPin {
    fn clone(&self) -> Self {
        *self
    }
}

impl TestPin {
    pub fn new(initial: bool) -> Self {
        Self {
            inner: Box::leak(Box::new(InnerPin::new(initial))),
        }
    }

    pub fn set_high(&self) {
        self.inner.set_value(true)
    }

    pub fn set_low(&self) {
        self.inner.set_value(false)
    }

    pub fn set(&self, high: bool) {
        self.inner.set_value(high)
    }

    pub fn is_set_high(&self) -> bool {
        self.inner.get_value()
    }
}

impl InnerPin {
    fn new(initial: bool) -> Self {
        Self {
            value: AtomicBool::new(initial),
            signal: Signal::new(),
        }
    }

    fn set_value(&self, value: bool) {
        let previous = self.value.swap(value, Ordering::SeqCst);
        if previous != value {
            self.signal.signal(());
        }
    }

    fn get_value(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }

    async fn wait_changed(&self) {
        self.signal.reset();
        self.signal.wait().await
    }
}

impl ErrorType for TestPin {
    type Error = Infallible;
}

impl InputPin for TestPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.inner.get_value())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.inner.get_value())
    }
}

impl OutputPin for TestPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.inner.set_value(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.inner.set_value(true);
        Ok(())
    }
}

impl Wait for TestPin {
    async fn wait_for_high(&mut self) -> Result<(), Infallible> {
        while !self.inner.get_value() {
            self.inner.wait_changed().await;
        }
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Infallible> {
        while self.inner.get_value() {
            self.inner.wait_changed().await;
        }
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Infallible> {
        loop {
            self.inner.wait_changed().await;
            if self.inner.get_value() {
                return Ok(());
            }
        }
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Infallible> {
        loop {
            self.inner.wait_changed().await;
            if !self.inner.get_value() {
                return Ok(());
            }
        }
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Infallible> {
        self.inner.wait_changed().await;
        Ok(())
    }
}

/// A command observed by a [`TestRadio`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RadioCall {
    Configure(TxPower),
    Address,
    SetAdvertisementData(AdvertisementFrame),
    Start(AdvertisingParameters),
    Stop,
}

impl RadioCall {
    pub fn command(&self) -> RadioCommand {
        match self {
            RadioCall::Configure(_) => RadioCommand::Configure,
            RadioCall::Address => RadioCommand::Address,
            RadioCall::SetAdvertisementData(_) => RadioCommand::SetAdvertisementData,
            RadioCall::Start(_) => RadioCommand::Start,
            RadioCall::Stop => RadioCommand::Stop,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rejected(pub RadioCommand);

#[derive(Default)]
struct RadioState {
    calls: Vec<RadioCall>,
    reject: Option<RadioCommand>,
    advertising: bool,
    data: Option<AdvertisementFrame>,
}

/// A radio stack that records every command. Clones share the record, so a
/// test can keep one while the beacon owns the other.
#[derive(Clone, Default)]
pub struct TestRadio {
    state: Rc<RefCell<RadioState>>,
}

impl TestRadio {
    pub const ADDRESS: [u8; 6] = [0x01, 0x02, 0x03, 0x04, 0x05, 0xc6];

    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every following `command` until [`TestRadio::accept_all`].
    pub fn reject(&self, command: RadioCommand) {
        self.state.borrow_mut().reject.replace(command);
    }

    pub fn accept_all(&self) {
        self.state.borrow_mut().reject.take();
    }

    pub fn calls(&self) -> Vec<RadioCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn is_advertising(&self) -> bool {
        self.state.borrow().advertising
    }

    /// The advertisement most recently accepted.
    pub fn advertisement(&self) -> Option<AdvertisementFrame> {
        self.state.borrow().data
    }

    fn call(&self, call: RadioCall) -> Result<(), Rejected> {
        let mut state = self.state.borrow_mut();
        if state.reject == Some(call.command()) {
            return Err(Rejected(call.command()));
        }
        state.calls.push(call);
        match call {
            RadioCall::SetAdvertisementData(frame) => state.data = Some(frame),
            RadioCall::Start(_) => state.advertising = true,
            RadioCall::Stop => state.advertising = false,
            _ => {}
        }
        Ok(())
    }
}

impl BeaconRadio for TestRadio {
    type Error = Rejected;

    fn configure(&mut self, tx_power: TxPower) -> Result<(), Rejected> {
        self.call(RadioCall::Configure(tx_power))
    }

    fn address(&mut self) -> Result<[u8; 6], Rejected> {
        self.call(RadioCall::Address)?;
        Ok(Self::ADDRESS)
    }

    fn set_advertisement_data(&mut self, frame: &AdvertisementFrame) -> Result<(), Rejected> {
        self.call(RadioCall::SetAdvertisementData(*frame))
    }

    fn start(&mut self, parameters: &AdvertisingParameters) -> Result<(), Rejected> {
        self.call(RadioCall::Start(*parameters))
    }

    fn stop(&mut self) -> Result<(), Rejected> {
        self.call(RadioCall::Stop)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LedFault;

#[derive(Default)]
struct LedState {
    on: bool,
    history: Vec<bool>,
    broken: bool,
}

/// An indicator that remembers every level it was set to.
#[derive(Clone, Default)]
pub struct TestLed {
    state: Rc<RefCell<LedState>>,
}

impl TestLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.state.borrow().on
    }

    pub fn history(&self) -> Vec<bool> {
        self.state.borrow().history.clone()
    }

    /// Make every following write fail.
    pub fn break_down(&self) {
        self.state.borrow_mut().broken = true;
    }
}

impl Led for TestLed {
    type Error = LedFault;

    fn set(&mut self, on: bool) -> Result<(), LedFault> {
        let mut state = self.state.borrow_mut();
        if state.broken {
            return Err(LedFault);
        }
        state.on = on;
        state.history.push(on);
        Ok(())
    }

    fn state(&self) -> Result<bool, LedFault> {
        Ok(self.state.borrow().on)
    }
}
