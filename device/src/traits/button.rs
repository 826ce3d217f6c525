pub use crate::domain::debounce::TriggerEvent;

/// A debounced push button.
#[allow(async_fn_in_trait)]
pub trait Button {
    type Error;

    /// Wait for the next debounced activation.
    ///
    /// Resolves at most once per physical press.
    async fn wait_pressed(&mut self) -> Result<TriggerEvent, Self::Error>;
}
