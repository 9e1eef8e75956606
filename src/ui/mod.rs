//! User interface subsystem - status widget elements and input mapping.
//!
//! The widget is a small element tree (two labels, two status glyphs and
//! a frame indicator) held by a [`StatusSurface`]. The render adapter
//! drives the surface; the toolkit behind it owns pixels and timing.
//!
//! ## Components
//!
//! - **Surface**: `StatusSurface` trait implemented by the toolkit
//! - **Canvas**: retained embedded-graphics surface with indicator animation
//! - **Frame clock**: real elapsed time between status passes
//! - **Render**: display state → surface calls, idempotent
//! - **Widget**: surface + per-widget transition memory
//! - **Input logic**: dongle buttons → endpoint actions
//!
//! The SSD1306 driver (`display.rs`) and the GPIO button tasks
//! (`buttons.rs`) are firmware-only and compiled into the binary.

pub mod canvas;
pub mod frame_clock;
pub mod input_logic;
pub mod render;
pub mod widget;

use embedded_graphics::primitives::Rectangle;

use crate::error::RenderError;

/// Children of a status widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    UsbLabel,
    UsbStatus,
    WirelessLabel,
    WirelessStatus,
    /// Frame that marks the active group and animates between them.
    Indicator,
}

impl Element {
    pub const COUNT: usize = 5;

    pub const ALL: [Element; Element::COUNT] = [
        Element::UsbLabel,
        Element::UsbStatus,
        Element::WirelessLabel,
        Element::WirelessStatus,
        Element::Indicator,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Status symbols. Each maps to a distinct drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    UsbReady,
    UsbNotReady,
    ProfileOpen,
    ProfileConnected,
    ProfileDisconnected,
}

/// Bounded move+resize of the indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndicatorMotion {
    pub from: Rectangle,
    pub to: Rectangle,
    pub duration_ms: u32,
}

/// Rendering toolkit interface for one widget instance.
///
/// Every mutation may fail once the rendering layer has destroyed the
/// surface; callers treat that as a per-widget fault.
pub trait StatusSurface {
    /// Whatever the toolkit needs to place a new widget.
    type Parent;

    /// Build the element tree under `parent`.
    fn create(parent: Self::Parent) -> Self
    where
        Self: Sized;

    fn set_hidden(&mut self, element: Element, hidden: bool) -> Result<(), RenderError>;

    fn set_text(&mut self, element: Element, text: &str) -> Result<(), RenderError>;

    fn set_glyph(&mut self, element: Element, glyph: Glyph) -> Result<(), RenderError>;

    /// Show the indicator at `area` immediately, cancelling any motion.
    fn place_indicator(&mut self, area: Rectangle) -> Result<(), RenderError>;

    /// Start a fire-and-forget indicator animation.
    fn animate_indicator(&mut self, motion: IndicatorMotion) -> Result<(), RenderError>;
}

/// Physical button events (after debouncing).
///
/// Three buttons on the dongle:
///   - UP/DOWN: step through wireless profiles
///   - SELECT: switch output between USB and BLE
///   - SELECT held: forget the active profile's pairing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Up,
    Down,
    Select,
    SelectHeld,
}
