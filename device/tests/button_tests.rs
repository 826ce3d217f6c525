#[cfg(feature = "std")]
mod tests {
    use drogue_beacon::actors::beacon::{Beacon, StackEvents};
    use drogue_beacon::domain::debounce::{Polarity, TriggerEvent};
    use drogue_beacon::drivers::button::{Button, PolledButton, DEFAULT_POLL_INTERVAL};
    use drogue_beacon::drivers::led::GpioLed;
    use drogue_beacon::testutil::*;
    use drogue_beacon::traits::button::Button as _;
    use drogue_beacon::traits::radio::{StackEvent, StackObserver};
    use drogue_beacon::{actors, BeaconConfig};
    use ector::ActorContext;
    use embassy_futures::join::join;
    use embassy_futures::select::{select3, Either3};
    use embassy_time::{with_timeout, Duration, Timer};
    use futures::executor::block_on;

    const SETTLE: Duration = Duration::from_millis(50);
    const QUIET: Duration = Duration::from_millis(200);

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Five bounces within 10 ms, then the contact settles at `end`.
    async fn bounce(pin: TestPin, end: bool) {
        for i in 0..10 {
            pin.set(i % 2 == 0);
            Timer::after(Duration::from_millis(1)).await;
        }
        pin.set(end);
    }

    async fn release_and_press(pin: TestPin) {
        Timer::after(Duration::from_millis(5)).await;
        pin.set_low();
        Timer::after(Duration::from_millis(5)).await;
        pin.set_high();
    }

    #[test]
    fn test_edge_bounces_yield_one_activation() {
        init();
        let pin = TestPin::new(false);
        let mut button = Button::new(pin, Polarity::Rising, SETTLE);

        block_on(async {
            let (event, _) = join(
                with_timeout(Duration::from_secs(1), button.wait_pressed()),
                bounce(pin, true),
            )
            .await;
            assert_eq!(TriggerEvent, event.unwrap().unwrap());

            // Held down: nothing more.
            assert!(with_timeout(QUIET, button.wait_pressed()).await.is_err());

            let (event, _) = join(
                with_timeout(Duration::from_secs(1), button.wait_pressed()),
                release_and_press(pin),
            )
            .await;
            assert_eq!(TriggerEvent, event.unwrap().unwrap());
        });
    }

    #[test]
    fn test_edge_noise_is_ignored() {
        init();
        let pin = TestPin::new(false);
        let mut button = Button::new(pin, Polarity::Rising, SETTLE);

        block_on(async {
            let (event, _) = join(with_timeout(QUIET, button.wait_pressed()), bounce(pin, false)).await;
            assert!(event.is_err());
        });
    }

    #[test]
    fn test_edge_falling_polarity() {
        init();
        let pin = TestPin::new(true);
        let mut button = Button::new(pin, Polarity::Falling, SETTLE);

        block_on(async {
            let (event, _) = join(
                with_timeout(Duration::from_secs(1), button.wait_pressed()),
                bounce(pin, false),
            )
            .await;
            assert_eq!(TriggerEvent, event.unwrap().unwrap());
        });
    }

    #[test]
    fn test_polled_bounces_yield_one_activation() {
        init();
        let pin = TestPin::new(false);
        let mut button = PolledButton::new(pin, Polarity::Rising, SETTLE, DEFAULT_POLL_INTERVAL);

        block_on(async {
            let (event, _) = join(
                with_timeout(Duration::from_secs(1), button.wait_pressed()),
                bounce(pin, true),
            )
            .await;
            assert_eq!(TriggerEvent, event.unwrap().unwrap());

            assert!(with_timeout(QUIET, button.wait_pressed()).await.is_err());
        });
    }

    #[test]
    fn test_button_toggles_beacon() {
        static BEACON: ActorContext<Beacon<TestRadio, GpioLed<TestPin>>> = ActorContext::new();
        static BUTTON: ActorContext<actors::button::Button<Button<TestPin>, TriggerEvent>> =
            ActorContext::new();
        static STACK_EVENTS: StackEvents = StackEvents::new();

        init();
        let config = BeaconConfig::DEFAULT;
        let pin = TestPin::new(false);
        let led_pin = TestPin::new(false);
        let radio = TestRadio::new();

        let mut beacon = Beacon::new(config, radio.clone(), GpioLed::new(led_pin))
            .with_stack_events(STACK_EVENTS.dyn_receiver());
        beacon.initialize().unwrap();
        let button = actors::button::Button::new(
            Button::new(pin, Polarity::Rising, config.debounce),
            BEACON.dyn_address(),
        );

        let script = async {
            bounce(pin, true).await;
            Timer::after(Duration::from_millis(150)).await;
            assert!(radio.is_advertising());
            assert!(led_pin.is_set_high());

            // Lifecycle events reach the beacon without changing anything.
            let observer = STACK_EVENTS.dyn_sender();
            observer.on_stack_event(StackEvent::Disabled);
            observer.on_stack_event(StackEvent::Enabled);
            Timer::after(Duration::from_millis(10)).await;
            assert!(STACK_EVENTS.is_empty());
            assert!(radio.is_advertising());

            release_and_press(pin).await;
            Timer::after(Duration::from_millis(150)).await;
            assert!(!radio.is_advertising());
            assert!(!led_pin.is_set_high());

            release_and_press(pin).await;
            Timer::after(Duration::from_millis(150)).await;
            assert!(radio.is_advertising());
        };

        let result = block_on(select3(BEACON.mount(beacon), BUTTON.mount(button), script));
        assert!(matches!(result, Either3::Third(())));

        assert!(led_pin.is_set_high());
        assert_eq!(2, radio.advertisement().unwrap().minor());
    }
}
