use crate::domain::debounce::{Debouncer, Polarity, TriggerEvent};
use crate::traits;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Ticker, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

/// Sampling period of [`PolledButton`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Edge-interrupt driven button. Each edge is debounced with a one-shot
/// timer armed for the settle time.
pub struct Button<P>
where
    P: Wait + InputPin,
{
    pin: P,
    polarity: Polarity,
    debouncer: Debouncer,
}

impl<P> Button<P>
where
    P: Wait + InputPin,
{
    pub fn new(pin: P, polarity: Polarity, settle: Duration) -> Self {
        Self {
            pin,
            polarity,
            debouncer: Debouncer::new(settle),
        }
    }

    fn asserted(&mut self) -> Result<bool, P::Error> {
        let high = self.pin.is_high()?;
        Ok(self.polarity.is_asserted(high))
    }

    fn on_edge(&mut self) -> Result<(), P::Error> {
        let asserted = self.asserted()?;
        trace!("button edge, asserted: {}", asserted);
        self.debouncer.edge(asserted, Instant::now());
        Ok(())
    }
}

impl<P> traits::button::Button for Button<P>
where
    P: Wait + InputPin,
{
    type Error = P::Error;

    async fn wait_pressed(&mut self) -> Result<TriggerEvent, Self::Error> {
        loop {
            match self.debouncer.deadline() {
                None => {
                    self.pin.wait_for_any_edge().await?;
                    self.on_edge()?;
                }
                Some(deadline) => {
                    match select(self.pin.wait_for_any_edge(), Timer::at(deadline)).await {
                        Either::First(edge) => {
                            edge?;
                            self.on_edge()?;
                        }
                        Either::Second(_) => {
                            let asserted = self.asserted()?;
                            if let Some(event) = self.debouncer.expire(asserted, Instant::now()) {
                                return Ok(event);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Button sampled at a fixed tick, for pins without edge detection.
pub struct PolledButton<P>
where
    P: InputPin,
{
    pin: P,
    polarity: Polarity,
    debouncer: Debouncer,
    ticker: Ticker,
}

impl<P> PolledButton<P>
where
    P: InputPin,
{
    pub fn new(pin: P, polarity: Polarity, settle: Duration, interval: Duration) -> Self {
        Self {
            pin,
            polarity,
            debouncer: Debouncer::new(settle),
            ticker: Ticker::every(interval),
        }
    }
}

impl<P> traits::button::Button for PolledButton<P>
where
    P: InputPin,
{
    type Error = P::Error;

    async fn wait_pressed(&mut self) -> Result<TriggerEvent, Self::Error> {
        loop {
            self.ticker.next().await;
            let high = self.pin.is_high()?;
            let asserted = self.polarity.is_asserted(high);
            if let Some(event) = self.debouncer.sample(asserted, Instant::now()) {
                return Ok(event);
            }
        }
    }
}
