//! Output status dongle firmware (nRF52840 + SoftDevice S140).
//!
//! Task layout:
//!
//! ```text
//!  USB device ─┐
//!  BLE link ───┼─► EndpointTracker ──► endpoint events ──► status task ──► SSD1306
//!  buttons ────┘        (shared)
//! ```
//!
//! Every writer mutates the shared tracker through [`update_endpoints`],
//! which forwards the resulting notification to the status task. The
//! status task is the only owner of the widgets and the display.

#![no_std]
#![no_main]

#[path = "ui/buttons.rs"]
mod buttons;
#[path = "ui/display.rs"]
mod display;
#[path = "ble/link.rs"]
mod link;
mod usb;

use core::cell::RefCell;

use defmt::{debug, error, info, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::{AnyPin, Pin as _};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_time::{Duration, Instant, Ticker};
use embassy_usb::class::hid::HidWriter;
use embassy_usb::UsbDevice;
use embedded_graphics::geometry::Point;
use nrf_softdevice::{raw, Softdevice};
use output_status::config::{ANIMATION_FRAME_MS, ENDPOINT_EVENT_QUEUE, MAX_WIDGETS};
use output_status::endpoint::{
    build_snapshot, EndpointEvent, EndpointSnapshot, EndpointSource, EndpointTracker, TopicSet,
    Transport,
};
use output_status::ui::canvas::GraphicsSurface;
use output_status::ui::frame_clock::FrameClock;
use output_status::ui::input_logic::{action_for, apply_action};
use output_status::ui::ButtonEvent;
use output_status::OutputStatus;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::buttons::{ButtonSender, BUTTON_QUEUE};
use crate::display::Display;
use crate::link::Bonder;

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

type OledBus = Twim<'static, peripherals::TWISPI0>;
type Status = OutputStatus<SharedEndpoints, GraphicsSurface, MAX_WIDGETS>;

/// Endpoint truth shared by every task.
static ENDPOINTS: Mutex<CriticalSectionRawMutex, RefCell<EndpointTracker>> =
    Mutex::new(RefCell::new(EndpointTracker::new()));

/// Notifications for the status task.
static ENDPOINT_EVENTS: Channel<CriticalSectionRawMutex, EndpointEvent, ENDPOINT_EVENT_QUEUE> =
    Channel::new();

static BUTTONS: Channel<CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE> = Channel::new();

static BONDER: StaticCell<Bonder> = StaticCell::new();

/// Read the shared tracker.
pub fn read_endpoints<R>(f: impl FnOnce(&EndpointTracker) -> R) -> R {
    ENDPOINTS.lock(|cell| f(&cell.borrow()))
}

/// Mutate the shared tracker and publish the change it reports.
pub fn update_endpoints(f: impl FnOnce(&mut EndpointTracker) -> Option<EndpointEvent>) {
    let event = ENDPOINTS.lock(|cell| f(&mut cell.borrow_mut()));
    if let Some(event) = event {
        // A full queue still holds a pending refresh that reads current truth.
        if ENDPOINT_EVENTS.try_send(event).is_err() {
            debug!("Endpoint event queue full, dropped {}", event);
        }
    }
}

/// Status-side view of the shared tracker.
struct SharedEndpoints;

impl EndpointSource for SharedEndpoints {
    fn selected_transport(&self) -> Option<Transport> {
        read_endpoints(|t| t.selected_transport())
    }

    fn wireless_profile_index(&self) -> Option<u8> {
        read_endpoints(|t| t.wireless_profile_index())
    }

    fn wireless_profile_connected(&self) -> Option<bool> {
        read_endpoints(|t| t.wireless_profile_connected())
    }

    fn wireless_profile_bonded(&self) -> Option<bool> {
        read_endpoints(|t| t.wireless_profile_bonded())
    }

    fn usb_ready(&self) -> Option<bool> {
        read_endpoints(|t| t.usb_ready())
    }

    fn snapshot(&self) -> EndpointSnapshot {
        read_endpoints(|t| build_snapshot(t))
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Output status dongle starting");

    // The SoftDevice reserves interrupt priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::USBD.set_priority(Priority::P2);
    interrupt::CLOCK_POWER.set_priority(Priority::P2);
    interrupt::SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0.set_priority(Priority::P3);

    let sd = Softdevice::enable(&softdevice_config());
    spawner.must_spawn(softdevice_task(sd));

    let usb = usb::init(p.USBD);
    spawner.must_spawn(usb_task(usb.device));
    spawner.must_spawn(hid_idle_task(usb.keyboard));

    spawner.must_spawn(ble_task(sd, BONDER.init(Bonder::new())));

    let tx = BUTTONS.sender();
    spawner.must_spawn(button_task(p.P0_11.degrade(), ButtonEvent::Up, None, tx));
    spawner.must_spawn(button_task(p.P0_12.degrade(), ButtonEvent::Down, None, tx));
    spawner.must_spawn(button_task(
        p.P0_24.degrade(),
        ButtonEvent::Select,
        Some(ButtonEvent::SelectHeld),
        tx,
    ));
    spawner.must_spawn(input_task(BUTTONS.receiver()));

    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config);
    match display::init(i2c) {
        Ok(oled) => spawner.must_spawn(status_task(oled)),
        Err(e) => error!("OLED init failed, status output disabled: {}", e),
    }

    info!("All tasks spawned");
}

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 128 }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 0,
            periph_role_count: 0,
            central_role_count: 1,
            central_sec_count: 1,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        ..Default::default()
    }
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, usb::UsbDriver>) -> ! {
    usb::run_usb_device(device).await
}

#[embassy_executor::task]
async fn hid_idle_task(keyboard: HidWriter<'static, usb::UsbDriver, 8>) -> ! {
    usb::hid_idle_task(keyboard).await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, bonder: &'static Bonder) -> ! {
    link::link_task(sd, bonder).await
}

#[embassy_executor::task(pool_size = 3)]
async fn button_task(
    pin: AnyPin,
    press: ButtonEvent,
    hold: Option<ButtonEvent>,
    tx: ButtonSender,
) -> ! {
    buttons::button_task(pin, press, hold, tx).await
}

/// Button presses become endpoint changes.
#[embassy_executor::task]
async fn input_task(rx: Receiver<'static, CriticalSectionRawMutex, ButtonEvent, BUTTON_QUEUE>) -> ! {
    loop {
        let action = action_for(rx.receive().await);
        info!("Endpoint action: {}", action);
        update_endpoints(|t| apply_action(t, action));
    }
}

/// Owns the widgets and the OLED. Redraws on every endpoint event and
/// at the animation frame rate while an indicator is moving.
#[embassy_executor::task]
async fn status_task(mut oled: Display<OledBus>) -> ! {
    let mut topics = TopicSet::empty();
    Status::subscribe(&mut topics);

    let mut status = Status::new(SharedEndpoints);
    if let Err(e) = status.init_widget(Point::zero()) {
        error!("Status widget init failed: {}", e);
    }
    present(&mut oled, &status);

    let mut frames = Ticker::every(Duration::from_millis(ANIMATION_FRAME_MS));
    let mut clock = FrameClock::new();
    clock.advance(Instant::now().as_millis());

    loop {
        let event = if status.surfaces().any(|s| s.is_animating()) {
            match select(ENDPOINT_EVENTS.receive(), frames.next()).await {
                Either::First(event) => Some(event),
                Either::Second(()) => None,
            }
        } else {
            let event = ENDPOINT_EVENTS.receive().await;
            frames.reset();
            Some(event)
        };

        // Motions move by real time on every pass, whatever woke us.
        let elapsed = clock.advance(Instant::now().as_millis());
        for surface in status.surfaces_mut() {
            surface.tick(elapsed);
        }

        if let Some(event) = event.filter(|e| topics.contains(*e)) {
            let fan_out = status.handle_event(event);
            if fan_out.failed > 0 {
                warn!("{} status widget(s) failed to update", fan_out.failed);
            }
        }
        present(&mut oled, &status);
    }
}

fn present(oled: &mut Display<OledBus>, status: &Status) {
    if let Err(e) = display::present(oled, status.surfaces()) {
        warn!("OLED update failed: {}", e);
    }
}
