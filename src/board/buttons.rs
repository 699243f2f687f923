//! GPIO button input with async debouncing.
//!
//! Five physical buttons (active-low with internal pull-up):
//!   - MODE     - cycle routes
//!   - NEXT     - UP line / next station
//!   - PREV     - DOWN line / previous station
//!   - SELECT   - confirm route / toggle halt
//!   - FINALIZE - save halts (short) / reset everything (held 2 s)
//!
//! Each button is handled by an async task that waits for a GPIO edge,
//! debounces it, and sends a `ButtonEvent` to the control loop.

use defmt::info;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Timer};
use halt_announcer::config::{BUTTON_DEBOUNCE_MS, LONG_PRESS_MS};
use halt_announcer::ui::input_logic::PressClassifier;
use halt_announcer::ui::{ButtonEvent, Press};

use super::now_ms;

/// Depth of the button event channel.
pub const BUTTON_QUEUE: usize = 4;

pub type ButtonSender = Sender<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE>;

fn debounce() -> Duration {
    Duration::from_millis(u64::from(BUTTON_DEBOUNCE_MS))
}

/// Run a single button loop for a press-only button.
///
/// Waits for the pin to go low (pressed), debounces, sends the event,
/// then waits for release before repeating.
pub async fn button_task(pin: AnyPin, event: ButtonEvent, tx: ButtonSender) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(debounce()).await;

        if btn.is_low() {
            info!("Button: {}", event);
            tx.send(event).await;

            // Wait for release to avoid repeat triggers.
            btn.wait_for_rising_edge().await;
            Timer::after(debounce()).await;
        }
    }
}

/// Run the FINALIZE button loop.
///
/// A long press is sent as soon as the hold time is reached; a short
/// press is sent on release.
pub async fn finalize_task(pin: AnyPin, tx: ButtonSender) -> ! {
    let mut btn = Input::new(pin, Pull::Up);
    let mut classifier = PressClassifier::new();
    let hold = Duration::from_millis(u64::from(LONG_PRESS_MS));

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(debounce()).await;
        if !btn.is_low() {
            continue;
        }
        classifier.press(now_ms());

        loop {
            match select(btn.wait_for_rising_edge(), Timer::after(hold)).await {
                Either::First(()) => break,
                Either::Second(()) => {
                    if let Some(Press::Long) = classifier.poll(now_ms()) {
                        info!("Button: FINALIZE held");
                        tx.send(ButtonEvent::Finalize(Press::Long)).await;
                    }
                }
            }
        }

        Timer::after(debounce()).await;
        if let Some(press) = classifier.release(now_ms()) {
            info!("Button: FINALIZE {}", press);
            tx.send(ButtonEvent::Finalize(press)).await;
        }
    }
}
