//! USB device subsystem - one boot keyboard interface on the host side.
//!
//! The nRF52840's USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. Device state callbacks are folded through
//! [`UsbBus`] into the endpoint tracker, so the status widget sees the
//! HID interface as ready exactly when the host has configured us and
//! the bus is awake.

use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use output_status::config;
use output_status::endpoint::{UsbBus, UsbConnState};
use static_cell::StaticCell;
use usbd_hid::descriptor::{KeyboardReport, SerializedDescriptor};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// Boot keyboard input report: modifiers, reserved, six key slots.
const KEYBOARD_REPORT_LEN: usize = 8;

static KEYBOARD_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static USB_STATE_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();

/// Raised whenever the host (re)configures the device.
static HID_CONFIGURED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Forwards device-state callbacks to the endpoint tracker.
struct UsbStateHandler {
    bus: UsbBus,
}

impl UsbStateHandler {
    fn publish(&self, state: UsbConnState) {
        if state.is_hid_ready() {
            HID_CONFIGURED.signal(());
        }
        crate::update_endpoints(|tracker| tracker.set_usb_state(state));
    }
}

impl embassy_usb::Handler for UsbStateHandler {
    fn enabled(&mut self, enabled: bool) {
        info!("USB enabled: {}", enabled);
        let state = self.bus.set_enabled(enabled);
        self.publish(state);
    }

    fn reset(&mut self) {
        let state = self.bus.reset();
        self.publish(state);
    }

    fn configured(&mut self, configured: bool) {
        info!("USB configured: {}", configured);
        let state = self.bus.set_configured(configured);
        self.publish(state);
    }

    fn suspended(&mut self, suspended: bool) {
        let state = self.bus.set_suspended(suspended);
        self.publish(state);
    }
}

pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_LEN>,
}

/// Build the USB device. Must be called exactly once.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 128]),
    );

    builder.handler(USB_STATE_HANDLER.init(UsbStateHandler { bus: UsbBus::new() }));

    let keyboard = HidWriter::new(
        &mut builder,
        KEYBOARD_STATE.init(State::new()),
        HidConfig {
            report_descriptor: KeyboardReport::desc(),
            request_handler: None,
            poll_ms: config::USB_HID_POLL_MS,
            max_packet_size: KEYBOARD_REPORT_LEN as u16,
        },
    );

    let device = builder.build();
    info!("USB HID keyboard interface initialised");

    UsbHidDevice { device, keyboard }
}

/// Run the USB device stack (enumeration, suspend/resume, endpoints).
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Send an all-keys-released report each time the host configures us,
/// so the host never keeps keys latched from a previous session.
pub async fn hid_idle_task(mut keyboard: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_LEN>) -> ! {
    loop {
        HID_CONFIGURED.wait().await;
        keyboard.ready().await;
        if keyboard.write(&[0u8; KEYBOARD_REPORT_LEN]).await.is_err() {
            warn!("USB keyboard idle report failed");
        }
    }
}
