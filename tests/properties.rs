//! Property tests for projection and rendering.

use embedded_graphics::geometry::Point;
use embedded_graphics::mock_display::MockDisplay;
use embedded_graphics::pixelcolor::BinaryColor;
use output_status::config::PROFILE_SYMBOL_COUNT;
use output_status::endpoint::{EndpointSnapshot, Transport};
use output_status::status::{
    project, ActiveSide, IndicatorStep, ProfileNumber, UsbStatus, WirelessStatus,
};
use output_status::ui::canvas::GraphicsSurface;
use output_status::ui::widget::OutputStatusWidget;
use proptest::prelude::*;

fn transport() -> impl Strategy<Value = Transport> {
    prop_oneof![Just(Transport::Usb), Just(Transport::Wireless)]
}

fn snapshot() -> impl Strategy<Value = EndpointSnapshot> {
    (transport(), any::<u8>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(selected_transport, index, connected, bonded, usb_ready)| EndpointSnapshot {
            selected_transport,
            wireless_profile_index: index,
            wireless_profile_connected: connected,
            wireless_profile_bonded: bonded,
            usb_ready,
        },
    )
}

fn with_transport(transport: Transport) -> impl Strategy<Value = EndpointSnapshot> {
    snapshot().prop_map(move |s| EndpointSnapshot {
        selected_transport: transport,
        ..s
    })
}

fn pixels(surface: &GraphicsSurface) -> MockDisplay<BinaryColor> {
    let mut display = MockDisplay::new();
    display.set_allow_overdraw(true);
    surface.draw(&mut display).unwrap();
    display
}

proptest! {
    #[test]
    fn usb_side_reflects_usb_ready(s in with_transport(Transport::Usb)) {
        let state = project(&s);
        prop_assert_eq!(state.active_side, ActiveSide::Usb);
        prop_assert_eq!(state.usb_status == UsbStatus::Ready, s.usb_ready);
    }

    #[test]
    fn open_profile_is_never_connected(s in with_transport(Transport::Wireless)) {
        let s = EndpointSnapshot { wireless_profile_bonded: false, ..s };
        prop_assert_eq!(project(&s).wireless_status, WirelessStatus::Open);
    }

    #[test]
    fn bonded_profile_follows_link(s in with_transport(Transport::Wireless)) {
        let s = EndpointSnapshot { wireless_profile_bonded: true, ..s };
        let expected = if s.wireless_profile_connected {
            WirelessStatus::Connected
        } else {
            WirelessStatus::Disconnected
        };
        prop_assert_eq!(project(&s).wireless_status, expected);
    }

    #[test]
    fn out_of_range_index_is_invalid(
        s in with_transport(Transport::Wireless),
        index in PROFILE_SYMBOL_COUNT..=u8::MAX,
    ) {
        let s = EndpointSnapshot { wireless_profile_index: index, ..s };
        prop_assert_eq!(project(&s).wireless_number, ProfileNumber::Invalid);
    }

    #[test]
    fn transition_target_is_active_side(s in snapshot()) {
        let state = project(&s);
        prop_assert_eq!(state.transition_to, state.active_side);
    }

    #[test]
    fn second_apply_is_a_no_op(s in snapshot()) {
        let state = project(&s);
        let mut widget = OutputStatusWidget::<GraphicsSurface>::new(Point::zero());
        widget.apply(&state).unwrap();
        let before = widget.surface().clone();

        prop_assert_eq!(widget.apply(&state).unwrap(), IndicatorStep::Hold);
        prop_assert_eq!(widget.surface(), &before);
        prop_assert_eq!(pixels(widget.surface()), pixels(&before));
        prop_assert_eq!(widget.surface().transitions_started(), 0);
    }

    #[test]
    fn transitions_count_side_changes(sides in proptest::collection::vec(transport(), 1..16)) {
        let mut widget = OutputStatusWidget::<GraphicsSurface>::new(Point::zero());
        for &side in &sides {
            let state = project(&EndpointSnapshot {
                selected_transport: side,
                ..EndpointSnapshot::SAFE_DEFAULT
            });
            widget.apply(&state).unwrap();
        }
        let changes = sides.windows(2).filter(|w| w[0] != w[1]).count() as u32;
        prop_assert_eq!(widget.surface().transitions_started(), changes);
    }
}
