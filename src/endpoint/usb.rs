//! USB device callbacks reduced to a connection state.
//!
//! The USB stack reports enable/configure/suspend separately; the
//! endpoint subsystem only cares about three levels:
//!
//! | enabled | configured | suspended | state        |
//! |---------|------------|-----------|--------------|
//! | no      | -          | -         | Disconnected |
//! | yes     | no         | -         | Powered      |
//! | yes     | yes        | yes       | Powered      |
//! | yes     | yes        | no        | Configured   |

/// USB connection level as seen by the endpoint subsystem.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbConnState {
    /// No VBUS / controller disabled.
    #[default]
    Disconnected,
    /// Cable present but the host has not (or no longer) configured us.
    Powered,
    /// Host configured the device; HID reports can be sent.
    Configured,
}

impl UsbConnState {
    /// USB HID interface has completed the handshake.
    pub fn is_hid_ready(self) -> bool {
        matches!(self, UsbConnState::Configured)
    }
}

/// Raw USB bus flags as reported by the device stack callbacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UsbBus {
    enabled: bool,
    configured: bool,
    suspended: bool,
}

impl UsbBus {
    pub const fn new() -> Self {
        Self {
            enabled: false,
            configured: false,
            suspended: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) -> UsbConnState {
        self.enabled = enabled;
        if !enabled {
            self.configured = false;
            self.suspended = false;
        }
        self.state()
    }

    /// Bus reset drops the configuration.
    pub fn reset(&mut self) -> UsbConnState {
        self.configured = false;
        self.suspended = false;
        self.state()
    }

    pub fn set_configured(&mut self, configured: bool) -> UsbConnState {
        self.configured = configured;
        self.state()
    }

    pub fn set_suspended(&mut self, suspended: bool) -> UsbConnState {
        self.suspended = suspended;
        self.state()
    }

    pub fn state(&self) -> UsbConnState {
        if !self.enabled {
            UsbConnState::Disconnected
        } else if self.configured && !self.suspended {
            UsbConnState::Configured
        } else {
            UsbConnState::Powered
        }
    }
}
