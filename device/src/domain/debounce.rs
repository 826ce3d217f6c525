//! Contact debouncing for a single push button.
//!
//! The [`Debouncer`] is fed the button level, either on every detected edge
//! ([`Debouncer::edge`] followed by [`Debouncer::expire`] once the
//! [`Debouncer::deadline`] passes) or at a fixed tick ([`Debouncer::sample`]).
//! Both encodings emit at most one [`TriggerEvent`] per physical press.

use embassy_time::{Duration, Instant};

/// Settle time used by the reference hardware.
pub const DEFAULT_SETTLE_TIME: Duration = Duration::from_millis(50);

/// A debounced activation of the button.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerEvent;

/// Which pin level counts as "pressed".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Pressed on a low-to-high transition.
    Rising,
    /// Pressed on a high-to-low transition.
    Falling,
}

impl Polarity {
    pub fn is_asserted(&self, high: bool) -> bool {
        match self {
            Polarity::Rising => high,
            Polarity::Falling => !high,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    Idle,
    Debouncing { since: Instant },
    Armed,
}

pub struct Debouncer {
    settle: Duration,
    state: DebounceState,
    last: Option<bool>,
}

impl Debouncer {
    pub const fn new(settle: Duration) -> Self {
        Self {
            settle,
            state: DebounceState::Idle,
            last: None,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn settle_time(&self) -> Duration {
        self.settle
    }

    /// When the pending settle timer fires, if one is running.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Debouncing { since } => Some(since + self.settle),
            _ => None,
        }
    }

    /// An edge was observed and the input now reads `asserted`.
    ///
    /// An asserting edge (re)starts the settle timer unless the button is
    /// already armed. A releasing edge returns to idle from any state.
    pub fn edge(&mut self, asserted: bool, now: Instant) {
        self.last = Some(asserted);
        self.state = match (self.state, asserted) {
            (_, false) => DebounceState::Idle,
            (DebounceState::Armed, true) => DebounceState::Armed,
            (_, true) => DebounceState::Debouncing { since: now },
        };
    }

    /// The settle timer may have elapsed; `asserted` is the current level.
    pub fn expire(&mut self, asserted: bool, now: Instant) -> Option<TriggerEvent> {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                if asserted {
                    self.state = DebounceState::Armed;
                    Some(TriggerEvent)
                } else {
                    self.state = DebounceState::Idle;
                    None
                }
            }
            _ => None,
        }
    }

    /// Polling encoding: feed the current level at a fixed tick.
    ///
    /// Level changes since the previous sample are treated as edges.
    pub fn sample(&mut self, asserted: bool, now: Instant) -> Option<TriggerEvent> {
        if self.last != Some(asserted) {
            self.edge(asserted, now);
        }
        self.expire(asserted, now)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn bounce_burst_yields_one_event() {
        let mut debouncer = Debouncer::default();
        // 5 bounces within 10 ms, ending pressed.
        let mut level = false;
        for t in 0..=10 {
            level = !level;
            debouncer.edge(level, at(t));
            assert_eq!(None, debouncer.expire(level, at(t)));
        }
        assert!(level);
        assert_eq!(Some(at(60)), debouncer.deadline());
        assert_eq!(None, debouncer.expire(true, at(59)));
        assert_eq!(Some(TriggerEvent), debouncer.expire(true, at(60)));
        assert_eq!(DebounceState::Armed, debouncer.state());
        assert_eq!(None, debouncer.expire(true, at(500)));
    }

    #[test]
    fn settle_time_sets_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_millis(20));
        assert_eq!(Duration::from_millis(20), debouncer.settle_time());
        assert_eq!(DEFAULT_SETTLE_TIME, Debouncer::default().settle_time());

        debouncer.edge(true, at(7));
        assert_eq!(Some(at(7) + debouncer.settle_time()), debouncer.deadline());
    }

    #[test]
    fn edges_while_debouncing_restart_timer() {
        let mut debouncer = Debouncer::default();
        debouncer.edge(true, at(0));
        debouncer.edge(true, at(30));
        assert_eq!(None, debouncer.expire(true, at(50)));
        assert_eq!(Some(TriggerEvent), debouncer.expire(true, at(80)));
    }

    #[test]
    fn transient_contact_is_noise() {
        let mut debouncer = Debouncer::default();
        debouncer.edge(true, at(0));
        debouncer.edge(false, at(3));
        assert_eq!(DebounceState::Idle, debouncer.state());
        assert_eq!(None, debouncer.deadline());
        assert_eq!(None, debouncer.expire(false, at(100)));
    }

    #[test]
    fn released_when_timer_fires() {
        let mut debouncer = Debouncer::default();
        debouncer.edge(true, at(0));
        assert_eq!(None, debouncer.expire(false, at(50)));
        assert_eq!(DebounceState::Idle, debouncer.state());
    }

    #[test]
    fn held_button_does_not_repeat() {
        let mut debouncer = Debouncer::default();
        debouncer.edge(true, at(0));
        assert_eq!(Some(TriggerEvent), debouncer.expire(true, at(50)));
        debouncer.edge(true, at(70));
        assert_eq!(DebounceState::Armed, debouncer.state());
        assert_eq!(None, debouncer.expire(true, at(200)));

        debouncer.edge(false, at(300));
        debouncer.edge(true, at(400));
        assert_eq!(Some(TriggerEvent), debouncer.expire(true, at(450)));
    }

    #[test]
    fn polled_samples() {
        let mut debouncer = Debouncer::new(Duration::from_millis(20));
        let levels = [
            false, true, false, true, true, true, true, true, true, true, true, false,
        ];
        let events = levels
            .iter()
            .enumerate()
            .filter_map(|(tick, level)| debouncer.sample(*level, at(tick as u64 * 5)))
            .count();
        assert_eq!(1, events);
        assert_eq!(DebounceState::Idle, debouncer.state());
    }

    #[test]
    fn polarity() {
        assert!(Polarity::Rising.is_asserted(true));
        assert!(!Polarity::Rising.is_asserted(false));
        assert!(Polarity::Falling.is_asserted(false));
        assert!(!Polarity::Falling.is_asserted(true));
    }
}
