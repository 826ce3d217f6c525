//! Compile-time beacon configuration.

use crate::domain::debounce::DEFAULT_SETTLE_TIME;
use crate::domain::ibeacon::{ProximityUuid, StaticIdentity};
use crate::traits::radio::{AdvertisingParameters, TxPower};
use embassy_time::Duration;

/// Bluetooth SIG company identifier used by iBeacon frames.
pub const APPLE_COMPANY_IDENTIFIER: u16 = 0x004c;

pub const PROXIMITY_UUID: ProximityUuid = ProximityUuid::new([
    0x33, 0x01, 0x3f, 0x7f, 0xcb, 0x46, 0x4d, 0xb6, 0xb4, 0xbe, 0x54, 0x2c, 0x31, 0x0a, 0x81, 0xeb,
]);
pub const MAJOR: u16 = 0x00CC;
/// Measured RSSI at 1 m distance (0xC3).
pub const MEASURED_POWER: i8 = -61;

pub const ADVERTISING_INTERVAL: Duration = Duration::from_millis(100);

#[cfg(not(feature = "low-power"))]
pub const TX_POWER: TxPower = TxPower::MINUS_16_DBM;
#[cfg(feature = "low-power")]
pub const TX_POWER: TxPower = TxPower::MINUS_40_DBM;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeaconConfig {
    pub identity: StaticIdentity,
    pub interval: Duration,
    pub tx_power: TxPower,
    pub debounce: Duration,
    pub company_identifier: u16,
}

impl BeaconConfig {
    pub const DEFAULT: BeaconConfig = BeaconConfig {
        identity: StaticIdentity::new(PROXIMITY_UUID, MAJOR, MEASURED_POWER),
        interval: ADVERTISING_INTERVAL,
        tx_power: TX_POWER,
        debounce: DEFAULT_SETTLE_TIME,
        company_identifier: APPLE_COMPANY_IDENTIFIER,
    };

    pub const fn with_identity(mut self, identity: StaticIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Panics, at compile time when used in a const, if the interval is out
    /// of the range allowed for non-connectable advertising.
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        assert!(valid_interval(interval), "advertising interval out of range");
        self.interval = interval;
        self
    }

    pub const fn with_tx_power(mut self, tx_power: TxPower) -> Self {
        self.tx_power = tx_power;
        self
    }

    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub const fn parameters(&self) -> AdvertisingParameters {
        AdvertisingParameters::non_connectable(self.interval)
    }
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn valid_interval(interval: Duration) -> bool {
    let us = interval.as_micros();
    us >= AdvertisingParameters::MIN_INTERVAL.as_micros()
        && us <= AdvertisingParameters::MAX_INTERVAL.as_micros()
}

const _: () = assert!(valid_interval(ADVERTISING_INTERVAL));
