//! Application-wide constants and compile-time configuration.
//!
//! Layout geometry, label text, animation timing, and the hardware
//! parameters of the dongle live here so they can be tuned in one place.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;

// Profiles

/// Number of wireless profile slots the endpoint subsystem keeps.
pub const WIRELESS_PROFILE_COUNT: usize = 5;

/// Number of profile numbers the widget can render ("BT1".."BT5").
/// Any index at or above this bound renders the invalid marker.
pub const PROFILE_SYMBOL_COUNT: u8 = 5;

// Widgets

/// Maximum number of status widgets that can be registered.
pub const MAX_WIDGETS: usize = 4;

/// Capacity of a single element label.
pub const LABEL_CAPACITY: usize = 8;

pub const USB_LABEL: &str = "USB";
pub const BT_LABEL: &str = "BT";

/// Shown instead of a profile number the widget has no symbol for.
pub const INVALID_PROFILE_LABEL: &str = "BT?";

// Layout (widget-local coordinates, 6x10 font)
//
//   +----------------------------+ +-------------------------------+
//   | USB [#]                    | | BT1 (o)                       |
//   +----------------------------+ +-------------------------------+
//    ^ USB anchor                   ^ wireless anchor

/// Total widget footprint.
pub const WIDGET_SIZE: Size = Size::new(64, 14);

pub const USB_LABEL_POS: Point = Point::new(3, 2);
pub const USB_STATUS_POS: Point = Point::new(23, 4);

pub const WIRELESS_LABEL_POS: Point = Point::new(34, 2);
pub const WIRELESS_STATUS_POS: Point = Point::new(54, 4);

/// Side length of a status glyph.
pub const GLYPH_SIZE: u32 = 5;

/// Indicator frame around the USB group.
pub const USB_ANCHOR: Rectangle = Rectangle::new(Point::new(0, 0), Size::new(30, 14));

/// Indicator frame around the wireless group.
pub const WIRELESS_ANCHOR: Rectangle = Rectangle::new(Point::new(31, 0), Size::new(33, 14));

// Animation

/// Duration of the indicator move+resize when the active side changes.
pub const TRANSITION_DURATION_MS: u32 = 240;

/// Redraw period while an indicator animation is running (~60 Hz).
pub const ANIMATION_FRAME_MS: u64 = 16;

// Buttons

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Holding SELECT this long clears the active wireless profile (ms).
pub const BUTTON_HOLD_MS: u64 = 1500;

// Event plumbing

/// Depth of the endpoint event channel feeding the status task.
pub const ENDPOINT_EVENT_QUEUE: usize = 8;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "output-status";
pub const USB_PRODUCT: &str = "BLE/USB Output Dongle";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

// BLE

/// Window for discovering a peripheral when the active profile is open (seconds).
pub const BLE_PAIRING_SCAN_SECS: u64 = 30;

/// BLE connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for HID).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Delay before retrying a bonded profile that failed to connect.
pub const BLE_RECONNECT_BACKOFF_MS: u64 = 2000;

/// Poll period for detecting that an established link went down.
pub const BLE_LINK_POLL_MS: u64 = 250;
