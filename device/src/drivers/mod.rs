pub mod button;
pub mod led;

pub trait ActiveLevel {
    /// Whether the output is driven high to turn it on.
    const ACTIVE_HIGH: bool;

    fn level(on: bool) -> bool {
        on == Self::ACTIVE_HIGH
    }
}

/// Discriminator for inputs/outputs that are active on high state.
pub struct ActiveHigh;
impl ActiveLevel for ActiveHigh {
    const ACTIVE_HIGH: bool = true;
}

/// Discriminator for inputs/outputs that are active on low state.
pub struct ActiveLow;
impl ActiveLevel for ActiveLow {
    const ACTIVE_HIGH: bool = false;
}
