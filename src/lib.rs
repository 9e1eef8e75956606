//! Output endpoint status for a BLE/USB dongle.
//!
//! Shows which endpoint (USB or a numbered BLE profile) the dongle is
//! sending output to, and the health of that endpoint, on every
//! registered status widget. Everything here is hardware-independent and
//! tested on the host; the nRF52840 firmware in `main.rs` wires it to the
//! SoftDevice, the USB peripheral, the buttons and the SSD1306.
//!
//! Usage: `cargo test --lib` (host) or
//! `cargo build --release --features embedded --target thumbv7em-none-eabihf`.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod endpoint;
pub mod error;
pub mod status;
pub mod ui;

pub mod ble {
    pub mod adv;
    pub mod bonds;
}

pub use error::{Error, RenderError};
pub use status::{DisplayState, OutputStatus};
