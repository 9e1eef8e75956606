//! Snapshot → display state projection.
//!
//! This is the only place that branches on the selected transport. The
//! render adapter and the transition controller consume the resulting
//! [`DisplayState`] without re-deriving anything.

use crate::config::PROFILE_SYMBOL_COUNT;
use crate::endpoint::{EndpointSnapshot, Transport};

/// Which symbol group is visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveSide {
    Usb,
    Wireless,
}

impl From<Transport> for ActiveSide {
    fn from(transport: Transport) -> Self {
        match transport {
            Transport::Usb => ActiveSide::Usb,
            Transport::Wireless => ActiveSide::Wireless,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbStatus {
    Ready,
    NotReady,
}

/// Profile number the widget can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileNumber {
    /// 0-based index, always below [`PROFILE_SYMBOL_COUNT`].
    Slot(u8),
    /// The endpoint reported an index we have no symbol for.
    Invalid,
}

impl ProfileNumber {
    pub fn from_index(index: u8) -> Self {
        if index < PROFILE_SYMBOL_COUNT {
            ProfileNumber::Slot(index)
        } else {
            ProfileNumber::Invalid
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WirelessStatus {
    /// No stored pairing in the active profile.
    Open,
    Connected,
    Disconnected,
}

/// Fully resolved, renderable status. Every field is always defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    pub active_side: ActiveSide,
    pub usb_status: UsbStatus,
    pub wireless_number: ProfileNumber,
    pub wireless_status: WirelessStatus,
    /// Side the indicator should end up on after this update.
    pub transition_to: ActiveSide,
}

/// Derive the display state for one snapshot. Pure and total.
pub fn project(snapshot: &EndpointSnapshot) -> DisplayState {
    let active_side = ActiveSide::from(snapshot.selected_transport);

    let usb_status = if snapshot.usb_ready {
        UsbStatus::Ready
    } else {
        UsbStatus::NotReady
    };

    let (wireless_number, wireless_status) = match active_side {
        // The profile index is meaningless here; show a fixed default.
        ActiveSide::Usb => (ProfileNumber::Slot(0), WirelessStatus::Open),
        ActiveSide::Wireless => (
            wireless_number(snapshot.wireless_profile_index),
            wireless_status(snapshot),
        ),
    };

    DisplayState {
        active_side,
        usb_status,
        wireless_number,
        wireless_status,
        transition_to: active_side,
    }
}

fn wireless_number(index: u8) -> ProfileNumber {
    let number = ProfileNumber::from_index(index);
    if number == ProfileNumber::Invalid {
        #[cfg(feature = "defmt")]
        defmt::warn!(
            "Profile index {} has no symbol (max {})",
            index,
            PROFILE_SYMBOL_COUNT
        );
    }
    number
}

/// Bonding gates connection: an open profile is never shown connected.
fn wireless_status(snapshot: &EndpointSnapshot) -> WirelessStatus {
    if !snapshot.wireless_profile_bonded {
        WirelessStatus::Open
    } else if snapshot.wireless_profile_connected {
        WirelessStatus::Connected
    } else {
        WirelessStatus::Disconnected
    }
}
