//! Dongle buttons → endpoint actions.

use super::ButtonEvent;
use crate::endpoint::{EndpointEvent, EndpointTracker};

/// What a button press asks the endpoint subsystem to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndpointAction {
    PrevProfile,
    NextProfile,
    ToggleTransport,
    /// Forget the pairing stored in the active profile.
    ClearProfile,
}

pub fn action_for(event: ButtonEvent) -> EndpointAction {
    match event {
        ButtonEvent::Up => EndpointAction::PrevProfile,
        ButtonEvent::Down => EndpointAction::NextProfile,
        ButtonEvent::Select => EndpointAction::ToggleTransport,
        ButtonEvent::SelectHeld => EndpointAction::ClearProfile,
    }
}

/// Run `action` against the tracker and return the notification it caused.
pub fn apply_action(tracker: &mut EndpointTracker, action: EndpointAction) -> Option<EndpointEvent> {
    match action {
        EndpointAction::PrevProfile => tracker.prev_profile(),
        EndpointAction::NextProfile => tracker.next_profile(),
        EndpointAction::ToggleTransport => tracker.toggle_transport(),
        EndpointAction::ClearProfile => tracker.clear_profile(tracker.active_profile_index()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WIRELESS_PROFILE_COUNT;
    use crate::endpoint::{AddressKind, BondAddress, ProfileSlot, Transport};

    const HOST: BondAddress = BondAddress::new(AddressKind::RandomStatic, [1, 2, 3, 4, 5, 6]);

    #[test]
    fn buttons_map_to_distinct_actions() {
        assert_eq!(action_for(ButtonEvent::Up), EndpointAction::PrevProfile);
        assert_eq!(action_for(ButtonEvent::Down), EndpointAction::NextProfile);
        assert_eq!(action_for(ButtonEvent::Select), EndpointAction::ToggleTransport);
        assert_eq!(action_for(ButtonEvent::SelectHeld), EndpointAction::ClearProfile);
    }

    #[test]
    fn select_toggles_transport() {
        let mut tracker = EndpointTracker::new();
        let event = apply_action(&mut tracker, action_for(ButtonEvent::Select));
        assert_eq!(event, Some(EndpointEvent::EndpointChanged));
        assert_eq!(tracker.selected(), Transport::Wireless);

        apply_action(&mut tracker, EndpointAction::ToggleTransport);
        assert_eq!(tracker.selected(), Transport::Usb);
    }

    #[test]
    fn down_then_up_returns_to_first_profile() {
        let mut tracker = EndpointTracker::new();
        assert_eq!(
            apply_action(&mut tracker, EndpointAction::NextProfile),
            Some(EndpointEvent::ActiveProfileChanged)
        );
        assert_eq!(tracker.active_profile_index(), 1);

        apply_action(&mut tracker, EndpointAction::PrevProfile);
        assert_eq!(tracker.active_profile_index(), 0);
    }

    #[test]
    fn up_from_first_profile_wraps_to_last() {
        let mut tracker = EndpointTracker::new();
        apply_action(&mut tracker, EndpointAction::PrevProfile);
        assert_eq!(tracker.active_profile_index(), WIRELESS_PROFILE_COUNT - 1);
    }

    #[test]
    fn holding_select_clears_only_the_active_profile() {
        let mut tracker = EndpointTracker::new();
        tracker.bond_profile(0, HOST);
        tracker.bond_profile(1, HOST);
        tracker.select_profile(1);
        tracker.set_profile_connected(1, true);

        let event = apply_action(&mut tracker, action_for(ButtonEvent::SelectHeld));
        assert_eq!(event, Some(EndpointEvent::ActiveProfileChanged));
        assert_eq!(*tracker.active_profile(), ProfileSlot::open());
        assert!(tracker.profile(0).unwrap().is_bonded());
        assert_eq!(tracker.selected(), Transport::Usb);
    }

    #[test]
    fn clearing_an_open_profile_is_silent() {
        let mut tracker = EndpointTracker::new();
        assert_eq!(apply_action(&mut tracker, EndpointAction::ClearProfile), None);
    }
}
