//! The beacon controller actor.
//!
//! Owns the [`BeaconSession`] together with the radio and the indicator. A
//! button activation toggles broadcasting; every start bumps the minor
//! identifier and re-encodes the advertisement.

use crate::config::BeaconConfig;
use crate::domain::beacon::{BeaconSession, BeaconState, Command, Transition};
use crate::traits::button::TriggerEvent;
use crate::traits::led::Led;
use crate::traits::radio::{BeaconRadio, StackEvent};
use ector::{Actor, DynamicAddress, Inbox};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, DynamicReceiver};

/// Radio stack events that may be pending before the beacon handles them.
pub const STACK_EVENT_QUEUE: usize = 4;

/// Carries radio stack lifecycle events to the beacon, next to its inbox,
/// so they never occupy the slot reserved for a trigger.
pub type StackEvents = Channel<CriticalSectionRawMutex, StackEvent, STACK_EVENT_QUEUE>;

/// The radio command that was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioCommand {
    Configure,
    Address,
    SetAdvertisementData,
    Start,
    Stop,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    Radio(RadioCommand),
    Hardware,
}

#[derive(Debug, PartialEq, Eq)]
pub enum BeaconError<R, H> {
    /// The radio stack refused a command.
    Radio { command: RadioCommand, error: R },
    /// An indicator or pin operation failed.
    Hardware(H),
}

impl<R, H> BeaconError<R, H> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BeaconError::Radio { command, .. } => ErrorKind::Radio(*command),
            BeaconError::Hardware(_) => ErrorKind::Hardware,
        }
    }
}

pub struct Beacon<R, L>
where
    R: BeaconRadio,
    L: Led,
{
    config: BeaconConfig,
    session: BeaconSession,
    radio: R,
    indicator: L,
    stack_events: Option<DynamicReceiver<'static, StackEvent>>,
}

impl<R, L> Beacon<R, L>
where
    R: BeaconRadio,
    L: Led,
{
    pub fn new(config: BeaconConfig, radio: R, indicator: L) -> Self {
        Self {
            config,
            session: BeaconSession::new(),
            radio,
            indicator,
            stack_events: None,
        }
    }

    /// Receive radio stack events from `events` while mounted.
    pub fn with_stack_events(mut self, events: DynamicReceiver<'static, StackEvent>) -> Self {
        self.stack_events.replace(events);
        self
    }

    pub fn session(&self) -> &BeaconSession {
        &self.session
    }

    pub fn state(&self) -> BeaconState {
        self.session.state()
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    /// Configure the radio and clear the indicator. Must succeed before the
    /// beacon is mounted.
    pub fn initialize(&mut self) -> Result<(), BeaconError<R::Error, L::Error>> {
        let tx_power = self.config.tx_power;
        self.radio
            .configure(tx_power)
            .map_err(|error| BeaconError::Radio {
                command: RadioCommand::Configure,
                error,
            })?;
        let addr = self.radio.address().map_err(|error| BeaconError::Radio {
            command: RadioCommand::Address,
            error,
        })?;
        self.indicator.set(false).map_err(BeaconError::Hardware)?;

        let identity = &self.config.identity;
        info!(
            "beacon uuid {:?} major {} tx power {} dBm",
            identity.uuid,
            identity.major,
            tx_power.dbm()
        );
        info!(
            "init complete, address {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            addr[5],
            addr[4],
            addr[3],
            addr[2],
            addr[1],
            addr[0]
        );
        Ok(())
    }

    /// Toggle broadcasting. Returns the state after the transition.
    ///
    /// A rejected radio command leaves the session as it was. An indicator
    /// failure is reported after the session moved on.
    pub fn on_trigger(&mut self) -> Result<BeaconState, BeaconError<R::Error, L::Error>> {
        let parameters = self.config.parameters();
        let transition = self.session.on_trigger(&self.config.identity, &parameters);
        self.apply(transition)?;
        Ok(self.session.state())
    }

    pub fn on_stack_event(&mut self, event: StackEvent) {
        debug!("radio stack event {:?}", event);
        if event == StackEvent::Disabled && self.session.is_broadcasting() {
            warn!("radio stack going down while broadcasting, advertising will not resume");
        }
        let transition = self.session.on_stack_event(event);
        debug_assert!(transition.commands.is_empty());
        self.session = transition.next;
    }

    fn apply(&mut self, transition: Transition) -> Result<(), BeaconError<R::Error, L::Error>> {
        let mut indicate = None;
        for command in transition.commands {
            match command {
                Command::SetAdvertisementData(frame) => self
                    .radio
                    .set_advertisement_data(&frame)
                    .map_err(|error| BeaconError::Radio {
                        command: RadioCommand::SetAdvertisementData,
                        error,
                    })?,
                Command::StartAdvertising(parameters) => {
                    self.radio
                        .start(&parameters)
                        .map_err(|error| BeaconError::Radio {
                            command: RadioCommand::Start,
                            error,
                        })?
                }
                Command::StopAdvertising => {
                    self.radio.stop().map_err(|error| BeaconError::Radio {
                        command: RadioCommand::Stop,
                        error,
                    })?
                }
                Command::Indicate(on) => indicate = Some(on),
            }
        }
        // The radio accepted everything, the indicator follows the new state.
        self.session = transition.next;
        match self.session.state() {
            BeaconState::Broadcasting => info!("start advertising: {}", self.session.minor()),
            BeaconState::Idle => info!("stop advertising"),
        }
        if let Some(on) = indicate {
            self.indicator.set(on).map_err(BeaconError::Hardware)?;
        }
        Ok(())
    }

    fn handle_trigger(&mut self) {
        match self.on_trigger() {
            Ok(_) => {}
            Err(e @ BeaconError::Radio { .. }) => error!(
                "trigger rejected in state {:?}: {:?}",
                self.session.state(),
                e.kind()
            ),
            Err(BeaconError::Hardware(_)) => {
                error!("indicator not updated, now {:?}", self.session.state())
            }
        }
    }
}

impl<R, L> Actor for Beacon<R, L>
where
    R: BeaconRadio,
    L: Led,
{
    type Message = TriggerEvent;

    async fn on_mount<M>(&mut self, _: DynamicAddress<TriggerEvent>, mut inbox: M) -> !
    where
        M: Inbox<TriggerEvent>,
    {
        loop {
            let next = match self.stack_events {
                Some(events) => select(inbox.next(), events.receive()).await,
                None => Either::First(inbox.next().await),
            };
            match next {
                Either::First(TriggerEvent) => self.handle_trigger(),
                Either::Second(event) => self.on_stack_event(event),
            }
        }
    }
}
