//! Hardware independent beacon logic.

pub mod beacon;
pub mod debounce;
pub mod ibeacon;
