//! Endpoint subsystem model - what the dongle is sending output to.
//!
//! The status widget never decides which endpoint is active; it reads the
//! current truth through [`EndpointSource`] whenever one of the
//! [`EndpointEvent`] notifications fires.
//!
//! ## Components
//!
//! - **Snapshot**: immutable view of endpoint + link health, built per event
//! - **Events**: change notifications and the subscription capability
//! - **Tracker**: in-memory endpoint state kept by the firmware tasks
//! - **USB**: reduction of USB device callbacks to a connection state

pub mod events;
pub mod snapshot;
pub mod tracker;
pub mod usb;

pub use events::{EndpointEvent, Subscribe, TopicSet};
pub use snapshot::{build_snapshot, EndpointSnapshot};
pub use tracker::{AddressKind, BondAddress, EndpointTracker, ProfileSlot};
pub use usb::{UsbBus, UsbConnState};

/// Physical/logical channel for device output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    Usb,
    Wireless,
}

impl Transport {
    /// The other transport.
    pub fn toggled(self) -> Self {
        match self {
            Transport::Usb => Transport::Wireless,
            Transport::Wireless => Transport::Usb,
        }
    }
}

/// Read access to the endpoint/connection subsystem.
///
/// Every query may go unanswered (`None`), e.g. while the BLE stack is
/// still starting. The snapshot builder substitutes safe defaults.
pub trait EndpointSource {
    fn selected_transport(&self) -> Option<Transport>;

    /// 0-based index of the active wireless profile.
    fn wireless_profile_index(&self) -> Option<u8>;

    fn wireless_profile_connected(&self) -> Option<bool>;

    /// `false` means the active profile is open (no stored pairing).
    fn wireless_profile_bonded(&self) -> Option<bool>;

    /// USB HID interface has completed enumeration.
    fn usb_ready(&self) -> Option<bool>;

    /// Every answer taken at the same instant.
    ///
    /// Sources that guard their state with a lock override this to
    /// answer all five queries under one acquisition, so a writer cannot
    /// land between two of them.
    fn snapshot(&self) -> EndpointSnapshot {
        build_snapshot(self)
    }
}

impl<T: EndpointSource + ?Sized> EndpointSource for &T {
    fn selected_transport(&self) -> Option<Transport> {
        (**self).selected_transport()
    }

    fn wireless_profile_index(&self) -> Option<u8> {
        (**self).wireless_profile_index()
    }

    fn wireless_profile_connected(&self) -> Option<bool> {
        (**self).wireless_profile_connected()
    }

    fn wireless_profile_bonded(&self) -> Option<bool> {
        (**self).wireless_profile_bonded()
    }

    fn usb_ready(&self) -> Option<bool> {
        (**self).usb_ready()
    }

    fn snapshot(&self) -> EndpointSnapshot {
        (**self).snapshot()
    }
}
