//! Unified error type for output-status.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Widgets
    /// A widget surface rejected a render call.
    Render(RenderError),

    /// The widget registry has no free slot.
    RegistryFull,

    // Firmware
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    /// I²C transaction to the display failed.
    Display,
}

/// Failure applying state to one rendering surface.
///
/// Isolated per widget: the fan-out counts it and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// The underlying surface was torn down by the rendering layer.
    SurfaceGone,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// Scan was cancelled or could not start.
    ScanFailed,
    /// Connection attempt failed.
    ConnectFailed,
    /// Link could not be encrypted / bonded.
    SecurityFailed,
}

// Convenience conversions

impl From<RenderError> for Error {
    fn from(e: RenderError) -> Self {
        Error::Render(e)
    }
}

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
