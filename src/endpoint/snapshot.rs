//! Point-in-time view of the endpoint subsystem.
//!
//! The status widget never holds on to collaborator answers: every
//! notification builds a fresh snapshot and projects it.

use super::{EndpointSource, Transport};

/// Endpoint and link health at the moment a notification was handled.
///
/// `wireless_profile_index` is only meaningful when `selected_transport`
/// is [`Transport::Wireless`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EndpointSnapshot {
    pub selected_transport: Transport,
    pub wireless_profile_index: u8,
    pub wireless_profile_connected: bool,
    pub wireless_profile_bonded: bool,
    pub usb_ready: bool,
}

impl EndpointSnapshot {
    /// USB selected, nothing ready, nothing bonded.
    pub const SAFE_DEFAULT: Self = Self {
        selected_transport: Transport::Usb,
        wireless_profile_index: 0,
        wireless_profile_connected: false,
        wireless_profile_bonded: false,
        usb_ready: false,
    };
}

impl Default for EndpointSnapshot {
    fn default() -> Self {
        Self::SAFE_DEFAULT
    }
}

/// Query the collaborators and assemble a snapshot.
///
/// Never fails: a query that goes unanswered falls back to the matching
/// field of [`EndpointSnapshot::SAFE_DEFAULT`].
pub fn build_snapshot<E: EndpointSource + ?Sized>(source: &E) -> EndpointSnapshot {
    let d = EndpointSnapshot::SAFE_DEFAULT;
    EndpointSnapshot {
        selected_transport: source.selected_transport().unwrap_or(d.selected_transport),
        wireless_profile_index: source
            .wireless_profile_index()
            .unwrap_or(d.wireless_profile_index),
        wireless_profile_connected: source
            .wireless_profile_connected()
            .unwrap_or(d.wireless_profile_connected),
        wireless_profile_bonded: source
            .wireless_profile_bonded()
            .unwrap_or(d.wireless_profile_bonded),
        usb_ready: source.usb_ready().unwrap_or(d.usb_ready),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that answers nothing.
    struct Silent;

    impl EndpointSource for Silent {
        fn selected_transport(&self) -> Option<Transport> {
            None
        }
        fn wireless_profile_index(&self) -> Option<u8> {
            None
        }
        fn wireless_profile_connected(&self) -> Option<bool> {
            None
        }
        fn wireless_profile_bonded(&self) -> Option<bool> {
            None
        }
        fn usb_ready(&self) -> Option<bool> {
            None
        }
    }

    /// Source where only the BLE stack answers.
    struct BleOnly;

    impl EndpointSource for BleOnly {
        fn selected_transport(&self) -> Option<Transport> {
            Some(Transport::Wireless)
        }
        fn wireless_profile_index(&self) -> Option<u8> {
            Some(3)
        }
        fn wireless_profile_connected(&self) -> Option<bool> {
            Some(true)
        }
        fn wireless_profile_bonded(&self) -> Option<bool> {
            Some(true)
        }
        fn usb_ready(&self) -> Option<bool> {
            None
        }
    }

    #[test]
    fn unanswered_queries_use_safe_defaults() {
        let snapshot = build_snapshot(&Silent);
        assert_eq!(snapshot, EndpointSnapshot::SAFE_DEFAULT);
        assert_eq!(snapshot.selected_transport, Transport::Usb);
        assert!(!snapshot.usb_ready);
        assert!(!snapshot.wireless_profile_connected);
        assert!(!snapshot.wireless_profile_bonded);
    }

    #[test]
    fn partial_answers_are_kept() {
        let snapshot = build_snapshot(&BleOnly);
        assert_eq!(snapshot.selected_transport, Transport::Wireless);
        assert_eq!(snapshot.wireless_profile_index, 3);
        assert!(snapshot.wireless_profile_connected);
        assert!(snapshot.wireless_profile_bonded);
        assert!(!snapshot.usb_ready);
    }

    #[test]
    fn builds_through_a_reference() {
        let source = &BleOnly;
        assert_eq!(build_snapshot(&source), build_snapshot(&BleOnly));
    }
}
