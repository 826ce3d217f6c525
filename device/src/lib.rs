#![cfg_attr(not(feature = "std"), no_std)]
//! Drogue Beacon is an async, no-alloc proximity beacon controller for embedded devices. It integrates with [embassy](https://github.com/embassy-rs/embassy), the embedded async project.
//!
//! A button toggles broadcasting of an iBeacon advertisement. Every time
//! broadcasting starts, the minor identifier in the advertisement is
//! incremented, so a scanner can tell consecutive sessions apart.
//!
//! # Actor System
//!
//! The controller is built from two actors. The [`actors::button::Button`]
//! actor waits for debounced activations and forwards them to the
//! [`actors::beacon::Beacon`] actor, which owns the radio, the indicator LED
//! and the session state. Each actor has exclusive access to its own state
//! and only communicates with other actors through message-passing.
//!
//! Radio stack lifecycle events reach the beacon on a separate
//! [`actors::beacon::StackEvents`] channel, so they never compete with a
//! button activation for the beacon's inbox.
//!
//! # Example
//!
//! ```ignore
//! use drogue_beacon::actors::beacon::{Beacon, StackEvents};
//! use drogue_beacon::domain::debounce::Polarity;
//! use drogue_beacon::drivers::{button::Button, led::GpioLed};
//! use drogue_beacon::{actors, domain::debounce::TriggerEvent, BeaconConfig};
//! use ector::{actor, ActorContext};
//!
//! type BeaconActor = Beacon<MyRadio, GpioLed<LedPin>>;
//!
//! static BEACON: ActorContext<BeaconActor> = ActorContext::new();
//! static STACK_EVENTS: StackEvents = StackEvents::new();
//!
//! #[embassy_executor::task]
//! async fn beacon_task(beacon: BeaconActor) {
//!     BEACON.mount(beacon).await
//! }
//!
//! #[embassy_executor::main]
//! async fn main(spawner: embassy_executor::Spawner) {
//!     let config = BeaconConfig::DEFAULT;
//!
//!     let radio = MyRadio::new(STACK_EVENTS.dyn_sender());
//!     let mut beacon = Beacon::new(config, radio, GpioLed::new(led_pin))
//!         .with_stack_events(STACK_EVENTS.dyn_receiver());
//!     beacon.initialize().unwrap();
//!     spawner.spawn(beacon_task(beacon)).unwrap();
//!
//!     let button = Button::new(button_pin, Polarity::Rising, config.debounce);
//!     actor!(
//!         spawner,
//!         button,
//!         actors::button::Button<Button<ButtonPin>, TriggerEvent>,
//!         actors::button::Button::new(button, BEACON.dyn_address())
//!     );
//! }
//! ```

pub(crate) mod fmt;

pub mod actors;

pub mod traits;

pub mod drivers;

pub mod domain;

pub mod config;
pub use config::BeaconConfig;

#[cfg(feature = "std")]
pub mod testutil;
