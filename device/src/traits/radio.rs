//! Radio stack seam for non-connectable beacon advertising.

use crate::domain::ibeacon::{AdvertisementFrame, FRAME_LEN};
use ector::ActorAddress;
use embassy_sync::channel::DynamicSender;
use embassy_time::Duration;
use heapless::Vec;

/// Maximum size of legacy advertising data.
pub const MAX_ADV_DATA_LEN: usize = 31;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_MANUFACTURER_SPECIFIC_DATA: u8 = 0xff;
const FLAG_BR_EDR_NOT_SUPPORTED: u8 = 0x04;

/// Length of the advertising data produced by [`advertising_data`].
pub const BEACON_ADV_DATA_LEN: usize = 3 + 4 + FRAME_LEN;

/// Transmit power in dBm.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxPower(pub i8);

impl TxPower {
    pub const MINUS_16_DBM: TxPower = TxPower(-16);
    pub const MINUS_40_DBM: TxPower = TxPower(-40);

    pub const fn dbm(&self) -> i8 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvertisingKind {
    NonConnectableUndirected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisingParameters {
    pub interval: Duration,
    pub kind: AdvertisingKind,
    /// `None` advertises until stopped.
    pub timeout: Option<Duration>,
}

impl AdvertisingParameters {
    /// Shortest interval allowed for non-connectable advertising.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(100);
    /// Longest interval allowed for non-connectable advertising.
    pub const MAX_INTERVAL: Duration = Duration::from_millis(10_240);

    pub const fn non_connectable(interval: Duration) -> Self {
        Self {
            interval,
            kind: AdvertisingKind::NonConnectableUndirected,
            timeout: None,
        }
    }

    /// Interval in the 0.625 ms units used by link-layer controllers,
    /// saturating at `u16::MAX`.
    pub const fn interval_units(&self) -> u16 {
        let units = self.interval.as_micros() / 625;
        if units > u16::MAX as u64 {
            u16::MAX
        } else {
            units as u16
        }
    }
}

/// Lifecycle notifications of the radio stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackEvent {
    EnablePrepare,
    Enabled,
    DisablePrepare,
    Disabled,
}

impl StackEvent {
    pub fn is_ready(&self) -> bool {
        matches!(self, StackEvent::Enabled)
    }
}

/// Receives radio stack lifecycle events.
pub trait StackObserver {
    fn on_stack_event(&self, event: StackEvent);
}

impl StackObserver for DynamicSender<'_, StackEvent> {
    fn on_stack_event(&self, event: StackEvent) {
        if self.try_notify(event).is_err() {
            warn!("dropped radio stack event {:?}", event);
        }
    }
}

/// An always-on radio stack able to broadcast a single advertisement.
///
/// Commands are accepted or rejected immediately; radio scheduling happens
/// underneath. Lifecycle events are delivered to a [`StackObserver`] handed
/// to the implementation when it is created.
pub trait BeaconRadio {
    type Error;

    fn configure(&mut self, tx_power: TxPower) -> Result<(), Self::Error>;

    /// The device address, least significant byte first.
    fn address(&mut self) -> Result<[u8; 6], Self::Error>;

    fn set_advertisement_data(&mut self, frame: &AdvertisementFrame) -> Result<(), Self::Error>;

    fn start(&mut self, parameters: &AdvertisingParameters) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;
}

/// Assemble the advertising data carrying `frame`: a flags structure and
/// the manufacturer specific data, prefixed by the little-endian
/// `company_identifier`.
pub fn advertising_data(
    company_identifier: u16,
    frame: &AdvertisementFrame,
) -> Vec<u8, MAX_ADV_DATA_LEN> {
    let mut data = Vec::new();
    let company = company_identifier.to_le_bytes();
    // Fits statically: BEACON_ADV_DATA_LEN <= MAX_ADV_DATA_LEN.
    let _ = data.extend_from_slice(&[0x02, AD_TYPE_FLAGS, FLAG_BR_EDR_NOT_SUPPORTED]);
    let _ = data.extend_from_slice(&[
        (1 + 2 + FRAME_LEN) as u8,
        AD_TYPE_MANUFACTURER_SPECIFIC_DATA,
        company[0],
        company[1],
    ]);
    let _ = data.extend_from_slice(frame.as_bytes());
    data
}

const _: () = assert!(BEACON_ADV_DATA_LEN <= MAX_ADV_DATA_LEN);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ibeacon::{ProximityUuid, StaticIdentity};

    #[test]
    fn manufacturer_data_layout() {
        let identity = StaticIdentity::new(ProximityUuid::new([0x11; 16]), 0x00CC, -61);
        let frame = identity.encode(2);
        let data = advertising_data(0x004c, &frame);

        assert_eq!(BEACON_ADV_DATA_LEN, data.len());
        assert_eq!(&data[..3], &[0x02, 0x01, 0x04]);
        assert_eq!(&data[3..7], &[0x1a, 0xff, 0x4c, 0x00]);
        assert_eq!(&data[7..], frame.as_bytes());
    }

    #[test]
    fn interval_units() {
        let params = AdvertisingParameters::non_connectable(Duration::from_millis(100));
        assert_eq!(160, params.interval_units());
        assert_eq!(None, params.timeout);
        assert_eq!(AdvertisingKind::NonConnectableUndirected, params.kind);

        let longest = AdvertisingParameters::non_connectable(AdvertisingParameters::MAX_INTERVAL);
        assert_eq!(16384, longest.interval_units());
    }

    #[test]
    fn interval_units_saturate() {
        let params = AdvertisingParameters::non_connectable(Duration::from_secs(41));
        assert_eq!(u16::MAX, params.interval_units());
        let params = AdvertisingParameters::non_connectable(Duration::from_secs(3600));
        assert_eq!(u16::MAX, params.interval_units());
    }

    #[test]
    fn observer_drops_events_when_full() {
        use embassy_sync::blocking_mutex::raw::NoopRawMutex;
        use embassy_sync::channel::Channel;

        let events: Channel<NoopRawMutex, StackEvent, 1> = Channel::new();
        let observer = events.dyn_sender();
        observer.on_stack_event(StackEvent::Enabled);
        observer.on_stack_event(StackEvent::Disabled);
        assert_eq!(Ok(StackEvent::Enabled), events.try_receive());
        assert!(events.try_receive().is_err());
    }

    #[test]
    fn only_enabled_is_ready() {
        assert!(StackEvent::Enabled.is_ready());
        assert!(!StackEvent::EnablePrepare.is_ready());
        assert!(!StackEvent::DisablePrepare.is_ready());
        assert!(!StackEvent::Disabled.is_ready());
    }
}
