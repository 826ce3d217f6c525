//! iBeacon proximity frame encoding.
//!
//! The frame is the manufacturer specific payload of the advertisement. The
//! company identifier that precedes it on air is added by the radio adapter,
//! see [`crate::traits::radio::advertising_data`].

use core::fmt::{Debug, Display, Formatter};

/// Total length of the proximity frame.
pub const FRAME_LEN: usize = 23;

/// Value of the payload-length tag: the number of bytes following it.
pub const PAYLOAD_LEN_TAG: u8 = (FRAME_LEN - 2) as u8;

/// Device type tag announcing a proximity beacon.
pub const DEVICE_TYPE_BEACON: u8 = 0x02;

const DEVICE_TYPE_OFFSET: usize = 0;
const PAYLOAD_LEN_OFFSET: usize = 1;
const UUID_OFFSET: usize = 2;
const MAJOR_OFFSET: usize = 18;
/// Offset of the big-endian minor identifier, the only field that changes.
pub const MINOR_OFFSET: usize = 20;
const MEASURED_POWER_OFFSET: usize = 22;

/// 128-bit proximity UUID, stored in transmission order.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProximityUuid(pub [u8; 16]);

impl ProximityUuid {
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl Display for ProximityUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl Debug for ProximityUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(self, f)
    }
}

/// The fields of a frame that never change for the lifetime of the beacon.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StaticIdentity {
    pub device_type: u8,
    pub uuid: ProximityUuid,
    pub major: u16,
    /// Calibrated RSSI at 1 m, in dBm.
    pub measured_power: i8,
}

impl StaticIdentity {
    pub const fn new(uuid: ProximityUuid, major: u16, measured_power: i8) -> Self {
        Self {
            device_type: DEVICE_TYPE_BEACON,
            uuid,
            major,
            measured_power,
        }
    }

    /// Encode a frame for this identity. See [`encode`].
    pub fn encode(&self, minor: u16) -> AdvertisementFrame {
        encode(self, minor)
    }
}

/// A complete, fixed-length proximity frame.
#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisementFrame([u8; FRAME_LEN]);

impl AdvertisementFrame {
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn device_type(&self) -> u8 {
        self.0[DEVICE_TYPE_OFFSET]
    }

    pub fn uuid(&self) -> ProximityUuid {
        let mut uuid = [0; 16];
        uuid.copy_from_slice(&self.0[UUID_OFFSET..MAJOR_OFFSET]);
        ProximityUuid(uuid)
    }

    pub fn major(&self) -> u16 {
        u16::from_be_bytes([self.0[MAJOR_OFFSET], self.0[MAJOR_OFFSET + 1]])
    }

    pub fn minor(&self) -> u16 {
        u16::from_be_bytes([self.0[MINOR_OFFSET], self.0[MINOR_OFFSET + 1]])
    }

    pub fn measured_power(&self) -> i8 {
        self.0[MEASURED_POWER_OFFSET] as i8
    }
}

impl AsRef<[u8]> for AdvertisementFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for AdvertisementFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdvertisementFrame")
            .field("uuid", &self.uuid())
            .field("major", &self.major())
            .field("minor", &self.minor())
            .field("measured_power", &self.measured_power())
            .finish()
    }
}

/// Build the proximity frame for `identity` carrying `minor`.
///
/// Layout: device type, payload length, UUID, major (big-endian),
/// minor (big-endian), measured power.
pub fn encode(identity: &StaticIdentity, minor: u16) -> AdvertisementFrame {
    let mut frame = [0; FRAME_LEN];
    frame[DEVICE_TYPE_OFFSET] = identity.device_type;
    frame[PAYLOAD_LEN_OFFSET] = PAYLOAD_LEN_TAG;
    frame[UUID_OFFSET..MAJOR_OFFSET].copy_from_slice(identity.uuid.as_bytes());
    frame[MAJOR_OFFSET..MINOR_OFFSET].copy_from_slice(&identity.major.to_be_bytes());
    frame[MINOR_OFFSET..MEASURED_POWER_OFFSET].copy_from_slice(&minor.to_be_bytes());
    frame[MEASURED_POWER_OFFSET] = identity.measured_power as u8;
    AdvertisementFrame(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: StaticIdentity = StaticIdentity::new(
        ProximityUuid::new([
            0x33, 0x01, 0x3f, 0x7f, 0xcb, 0x46, 0x4d, 0xb6, 0xb4, 0xbe, 0x54, 0x2c, 0x31, 0x0a,
            0x81, 0xeb,
        ]),
        0x00CC,
        -61,
    );

    #[test]
    fn reference_layout() {
        let frame = encode(&IDENTITY, 1);
        #[rustfmt::skip]
        let expected: [u8; FRAME_LEN] = [
            0x02, 0x15,
            0x33, 0x01, 0x3f, 0x7f, 0xcb, 0x46, 0x4d, 0xb6,
            0xb4, 0xbe, 0x54, 0x2c, 0x31, 0x0a, 0x81, 0xeb,
            0x00, 0xCC,
            0x00, 0x01,
            0xC3,
        ];
        assert_eq!(frame.as_bytes(), &expected);
    }

    #[test]
    fn minor_is_big_endian() {
        let frame = encode(&IDENTITY, 0xABCD);
        assert_eq!(&frame.as_bytes()[MINOR_OFFSET..MINOR_OFFSET + 2], &[0xAB, 0xCD]);
        assert_eq!(frame.minor(), 0xABCD);
    }

    #[test]
    fn encoding_is_deterministic() {
        for minor in [0, 1, 0x00FF, 0x0100, 0x7FFF, 0xFFFF] {
            assert_eq!(encode(&IDENTITY, minor), encode(&IDENTITY, minor));
            assert_eq!(encode(&IDENTITY, minor).minor(), minor);
        }
    }

    #[test]
    fn only_minor_bytes_vary() {
        let base = encode(&IDENTITY, 0);
        for minor in (0..=u16::MAX).step_by(257) {
            let frame = encode(&IDENTITY, minor);
            for (i, (a, b)) in base.as_bytes().iter().zip(frame.as_bytes()).enumerate() {
                if i != MINOR_OFFSET && i != MINOR_OFFSET + 1 {
                    assert_eq!(a, b, "byte {} changed for minor {}", i, minor);
                }
            }
        }
    }

    #[test]
    fn accessors_recover_identity() {
        let frame = IDENTITY.encode(7);
        assert_eq!(frame.device_type(), DEVICE_TYPE_BEACON);
        assert_eq!(frame.uuid(), IDENTITY.uuid);
        assert_eq!(frame.major(), 0x00CC);
        assert_eq!(frame.measured_power(), -61);
    }

    #[test]
    fn uuid_display() {
        extern crate std;
        use std::string::ToString;
        assert_eq!(
            IDENTITY.uuid.to_string(),
            "33013f7f-cb46-4db6-b4be-542c310a81eb"
        );
    }
}
