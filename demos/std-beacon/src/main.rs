use drogue_beacon::{
    actors::{
        self,
        beacon::{Beacon, StackEvents},
    },
    domain::debounce::{Polarity, TriggerEvent},
    drivers::button::Button,
    testutil::TestPin,
    traits::radio::StackEvent,
    BeaconConfig,
};
use ector::ActorContext;
use embassy_executor::Spawner;
use embassy_sync::channel::DynamicSender;
use embassy_time::{Duration, Timer};

mod console;
use console::{ConsoleLed, ConsoleRadio};

const CONFIG: BeaconConfig = BeaconConfig::DEFAULT;

/// Presses made by the scripted button before the demo exits.
const PRESSES: u32 = 5;

type BeaconActor = Beacon<ConsoleRadio<DynamicSender<'static, StackEvent>>, ConsoleLed>;
type ButtonActor = actors::button::Button<Button<TestPin>, TriggerEvent>;

static BEACON: ActorContext<BeaconActor> = ActorContext::new();
static BUTTON: ActorContext<ButtonActor> = ActorContext::new();
static STACK_EVENTS: StackEvents = StackEvents::new();

#[embassy_executor::task]
async fn beacon_task(beacon: BeaconActor) {
    BEACON.mount(beacon).await
}

#[embassy_executor::task]
async fn button_task(button: ButtonActor) {
    BUTTON.mount(button).await
}

/// Presses a bouncy contact every couple of seconds.
#[embassy_executor::task]
async fn presser(pin: TestPin) {
    for press in 1..=PRESSES {
        Timer::after(Duration::from_secs(2)).await;
        log::info!("[button] press #{}", press);
        for i in 0..10 {
            pin.set(i % 2 == 0);
            Timer::after(Duration::from_millis(1)).await;
        }
        pin.set_high();
        Timer::after(Duration::from_millis(300)).await;
        pin.set_low();
    }
    Timer::after(Duration::from_millis(100)).await;
    std::process::exit(0);
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_nanos()
        .init();

    let radio = ConsoleRadio::new(STACK_EVENTS.dyn_sender(), CONFIG.company_identifier);
    let mut beacon = Beacon::new(CONFIG, radio, ConsoleLed::default())
        .with_stack_events(STACK_EVENTS.dyn_receiver());
    if let Err(e) = beacon.initialize() {
        log::error!("beacon initialization failed: {:?}", e.kind());
        return;
    }

    let pin = TestPin::new(false);
    let button = actors::button::Button::new(
        Button::new(pin, Polarity::Rising, CONFIG.debounce),
        BEACON.dyn_address(),
    );

    spawner.spawn(beacon_task(beacon)).unwrap();
    spawner.spawn(button_task(button)).unwrap();
    spawner.spawn(presser(pin)).unwrap();
}
