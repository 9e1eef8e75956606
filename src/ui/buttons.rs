//! GPIO button input with async debouncing.
//!
//! Three physical buttons (active-low with internal pull-up):
//!   - UP     - previous wireless profile
//!   - DOWN   - next wireless profile
//!   - SELECT - switch output between USB and BLE; hold to clear the
//!     active wireless profile
//!
//! Each button is handled by an async task that waits for a GPIO edge,
//! debounces it, and sends a `ButtonEvent` to the input channel. A
//! button with a hold event reports on release, or once the hold time
//! is reached.

use defmt::info;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{with_timeout, Duration, Timer};
use output_status::config::{BUTTON_DEBOUNCE_MS, BUTTON_HOLD_MS};
use output_status::ui::ButtonEvent;

pub const BUTTON_QUEUE: usize = 4;

pub type ButtonSender = Sender<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE>;

/// Wait for a press, debounce, send the event, then wait for release.
pub async fn button_task(
    pin: AnyPin,
    press: ButtonEvent,
    hold: Option<ButtonEvent>,
    tx: ButtonSender,
) -> ! {
    let mut btn = Input::new(pin, Pull::Up);

    loop {
        btn.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        if !btn.is_low() {
            continue;
        }

        let event = match hold {
            None => press,
            Some(held) => {
                let release = btn.wait_for_rising_edge();
                match with_timeout(Duration::from_millis(BUTTON_HOLD_MS), release).await {
                    Ok(()) => press,
                    Err(_) => held,
                }
            }
        };
        info!("Button: {}", event);
        tx.send(event).await;

        // Avoid repeat triggers while held.
        if btn.is_low() {
            btn.wait_for_rising_edge().await;
        }
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
    }
}
