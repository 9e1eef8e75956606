//! In-memory endpoint state for the dongle.
//!
//! The firmware tasks (USB handler, BLE link, buttons) are the only
//! writers. Every mutator returns the notification the change causes, or
//! `None` when the call left the state as it was, so producers can
//! forward exactly one event per real change.

use super::{EndpointEvent, EndpointSource, Transport, UsbConnState};
use crate::config::WIRELESS_PROFILE_COUNT;

/// BLE address type of a bonded peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressKind {
    Public,
    RandomStatic,
    RandomPrivateResolvable,
    RandomPrivateNonResolvable,
    Anonymous,
}

/// Identity of a bonded peer. Reconnects need the type as well as the
/// bytes: a public or resolvable address taken as random static never
/// matches the whitelist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BondAddress {
    pub kind: AddressKind,
    pub bytes: [u8; 6],
}

impl BondAddress {
    pub const fn new(kind: AddressKind, bytes: [u8; 6]) -> Self {
        Self { kind, bytes }
    }
}

/// One stored wireless pairing slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProfileSlot {
    pub address: Option<BondAddress>,
    pub connected: bool,
}

impl ProfileSlot {
    pub const fn open() -> Self {
        Self {
            address: None,
            connected: false,
        }
    }

    pub fn is_bonded(&self) -> bool {
        self.address.is_some()
    }
}

pub struct EndpointTracker {
    selected: Transport,
    profiles: [ProfileSlot; WIRELESS_PROFILE_COUNT],
    active_profile: usize,
    usb: UsbConnState,
}

impl Default for EndpointTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EndpointTracker {
    pub const fn new() -> Self {
        Self {
            selected: Transport::Usb,
            profiles: [ProfileSlot::open(); WIRELESS_PROFILE_COUNT],
            active_profile: 0,
            usb: UsbConnState::Disconnected,
        }
    }

    pub fn selected(&self) -> Transport {
        self.selected
    }

    pub fn active_profile_index(&self) -> usize {
        self.active_profile
    }

    pub fn active_profile(&self) -> &ProfileSlot {
        &self.profiles[self.active_profile]
    }

    pub fn profile(&self, index: usize) -> Option<&ProfileSlot> {
        self.profiles.get(index)
    }

    pub fn usb_state(&self) -> UsbConnState {
        self.usb
    }

    // Transport selection

    pub fn select_transport(&mut self, transport: Transport) -> Option<EndpointEvent> {
        if self.selected == transport {
            return None;
        }
        self.selected = transport;
        Some(EndpointEvent::EndpointChanged)
    }

    pub fn toggle_transport(&mut self) -> Option<EndpointEvent> {
        self.select_transport(self.selected.toggled())
    }

    // Profile selection

    /// Make `index` the active profile. Out-of-range indices are ignored.
    pub fn select_profile(&mut self, index: usize) -> Option<EndpointEvent> {
        if index >= WIRELESS_PROFILE_COUNT || index == self.active_profile {
            return None;
        }
        self.active_profile = index;
        Some(EndpointEvent::ActiveProfileChanged)
    }

    /// Step to the next profile, wrapping after the last slot.
    pub fn next_profile(&mut self) -> Option<EndpointEvent> {
        self.select_profile((self.active_profile + 1) % WIRELESS_PROFILE_COUNT)
    }

    /// Step to the previous profile, wrapping before the first slot.
    pub fn prev_profile(&mut self) -> Option<EndpointEvent> {
        let prev = (self.active_profile + WIRELESS_PROFILE_COUNT - 1) % WIRELESS_PROFILE_COUNT;
        self.select_profile(prev)
    }

    // Profile contents

    pub fn bond_profile(&mut self, index: usize, address: BondAddress) -> Option<EndpointEvent> {
        let slot = self.profiles.get_mut(index)?;
        if slot.address == Some(address) {
            return None;
        }
        slot.address = Some(address);
        self.profile_event(index)
    }

    /// Forget the pairing in `index`; an open slot cannot stay connected.
    pub fn clear_profile(&mut self, index: usize) -> Option<EndpointEvent> {
        let slot = self.profiles.get_mut(index)?;
        if *slot == ProfileSlot::open() {
            return None;
        }
        *slot = ProfileSlot::open();
        self.profile_event(index)
    }

    pub fn set_profile_connected(&mut self, index: usize, connected: bool) -> Option<EndpointEvent> {
        let slot = self.profiles.get_mut(index)?;
        if slot.connected == connected {
            return None;
        }
        slot.connected = connected;
        self.profile_event(index)
    }

    /// Changes to inactive slots are not visible on the widget.
    fn profile_event(&self, index: usize) -> Option<EndpointEvent> {
        (index == self.active_profile).then_some(EndpointEvent::ActiveProfileChanged)
    }

    // USB

    pub fn set_usb_state(&mut self, state: UsbConnState) -> Option<EndpointEvent> {
        if self.usb == state {
            return None;
        }
        self.usb = state;
        Some(EndpointEvent::UsbConnStateChanged)
    }
}

impl EndpointSource for EndpointTracker {
    fn selected_transport(&self) -> Option<Transport> {
        Some(self.selected)
    }

    fn wireless_profile_index(&self) -> Option<u8> {
        u8::try_from(self.active_profile).ok()
    }

    fn wireless_profile_connected(&self) -> Option<bool> {
        Some(self.active_profile().connected)
    }

    fn wireless_profile_bonded(&self) -> Option<bool> {
        Some(self.active_profile().is_bonded())
    }

    fn usb_ready(&self) -> Option<bool> {
        Some(self.usb.is_hid_ready())
    }
}
