pub mod beacon;
pub mod button;
