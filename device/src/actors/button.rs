use crate::traits;
use ector::{Actor, ActorAddress, DynamicAddress, Inbox};
use embassy_time::{Duration, Timer};

pub use crate::traits::button::TriggerEvent;

const PIN_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Forwards every debounced activation of a button to a handler actor.
///
/// Delivery does not wait: an activation that arrives while the handler
/// still has one pending is dropped.
pub struct Button<B, M>
where
    B: traits::button::Button,
    M: From<TriggerEvent> + 'static,
{
    inner: B,
    handler: DynamicAddress<M>,
}

impl<B, M> Button<B, M>
where
    B: traits::button::Button,
    M: From<TriggerEvent> + 'static,
{
    pub fn new(inner: B, handler: DynamicAddress<M>) -> Self {
        Self { inner, handler }
    }
}

impl<B, M> Actor for Button<B, M>
where
    B: traits::button::Button,
    M: From<TriggerEvent> + 'static,
{
    type Message = ();

    async fn on_mount<I>(&mut self, _: DynamicAddress<()>, _: I) -> !
    where
        I: Inbox<()>,
    {
        loop {
            match self.inner.wait_pressed().await {
                Ok(event) => {
                    debug!("button activated");
                    if self.handler.try_notify(M::from(event)).is_err() {
                        warn!("activation dropped, previous one still pending");
                    }
                }
                Err(_) => {
                    error!("error reading button pin");
                    Timer::after(PIN_ERROR_BACKOFF).await;
                }
            }
        }
    }
}
