//! Beacon session state and its transitions.
//!
//! Transitions are pure: they take the current [`BeaconSession`] and return
//! the next one together with the commands that realize it. The caller
//! commits the next session only after the radio accepted the commands.

use super::ibeacon::{AdvertisementFrame, StaticIdentity};
use crate::traits::radio::{AdvertisingParameters, StackEvent};
use heapless::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeaconState {
    Idle,
    Broadcasting,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetAdvertisementData(AdvertisementFrame),
    StartAdvertising(AdvertisingParameters),
    StopAdvertising,
    Indicate(bool),
}

const COMMANDS_CAPACITY: usize = 3;

pub type Commands = Vec<Command, COMMANDS_CAPACITY>;

#[derive(Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: BeaconSession,
    pub commands: Commands,
}

/// Minor counter and broadcast state. The counter wraps and is only bumped
/// when broadcasting starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeaconSession {
    minor: u16,
    state: BeaconState,
}

impl BeaconSession {
    pub const fn new() -> Self {
        Self::with_minor(0)
    }

    pub const fn with_minor(minor: u16) -> Self {
        Self {
            minor,
            state: BeaconState::Idle,
        }
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }

    pub fn state(&self) -> BeaconState {
        self.state
    }

    pub fn is_broadcasting(&self) -> bool {
        self.state == BeaconState::Broadcasting
    }

    /// The button was activated.
    pub fn on_trigger(
        &self,
        identity: &StaticIdentity,
        parameters: &AdvertisingParameters,
    ) -> Transition {
        let (next, commands) = match self.state {
            BeaconState::Idle => {
                let next = BeaconSession {
                    minor: self.minor.wrapping_add(1),
                    state: BeaconState::Broadcasting,
                };
                let commands = commands_of([
                    Command::SetAdvertisementData(identity.encode(next.minor)),
                    Command::StartAdvertising(*parameters),
                    Command::Indicate(true),
                ]);
                (next, commands)
            }
            BeaconState::Broadcasting => (
                BeaconSession {
                    minor: self.minor,
                    state: BeaconState::Idle,
                },
                commands_of([Command::StopAdvertising, Command::Indicate(false)]),
            ),
        };
        Transition { next, commands }
    }

    /// Radio stack lifecycle events never change the session; advertising is
    /// not resumed after the stack is re-enabled.
    pub fn on_stack_event(&self, _event: StackEvent) -> Transition {
        Transition {
            next: *self,
            commands: Commands::new(),
        }
    }
}

impl Default for BeaconSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect a fixed list of commands. `N` is bounded by the capacity of
/// [`Commands`] at compile time.
fn commands_of<const N: usize>(list: [Command; N]) -> Commands {
    const { assert!(N <= COMMANDS_CAPACITY) };
    list.into_iter().collect()
}
