//! Render adapter - one display state onto one widget.
//!
//! Pure state → visual mapping. Every element's content is written on
//! every apply (hidden ones included), so the element tree depends only
//! on the state; the indicator is the one exception and follows the
//! widget's transition memory.

use core::fmt::Write;

use embedded_graphics::primitives::Rectangle;
use heapless::String;

use super::widget::OutputStatusWidget;
use super::{Element, Glyph, IndicatorMotion, StatusSurface};
use crate::config::{
    BT_LABEL, INVALID_PROFILE_LABEL, LABEL_CAPACITY, TRANSITION_DURATION_MS, USB_ANCHOR,
    USB_LABEL, WIRELESS_ANCHOR,
};
use crate::error::RenderError;
use crate::status::{
    ActiveSide, DisplayState, IndicatorStep, ProfileNumber, Transition, UsbStatus, WirelessStatus,
};

/// Apply `state` to `widget`.
///
/// The widget's transition memory is committed only when every surface
/// call succeeded, so a failed render is retried in full next time.
pub fn apply<S: StatusSurface>(
    widget: &mut OutputStatusWidget<S>,
    state: &DisplayState,
) -> Result<IndicatorStep, RenderError> {
    let (surface, transitions) = widget.parts_mut();
    let step = transitions.plan(state.transition_to);

    surface.set_text(Element::UsbLabel, USB_LABEL)?;
    surface.set_glyph(Element::UsbStatus, usb_glyph(state.usb_status))?;
    surface.set_text(Element::WirelessLabel, &profile_label(state.wireless_number))?;
    surface.set_glyph(Element::WirelessStatus, wireless_glyph(state.wireless_status))?;

    let usb_hidden = state.active_side != ActiveSide::Usb;
    surface.set_hidden(Element::UsbLabel, usb_hidden)?;
    surface.set_hidden(Element::UsbStatus, usb_hidden)?;
    surface.set_hidden(Element::WirelessLabel, !usb_hidden)?;
    surface.set_hidden(Element::WirelessStatus, !usb_hidden)?;

    match step {
        IndicatorStep::Place(side) => surface.place_indicator(anchor(side))?,
        IndicatorStep::Hold => {}
        IndicatorStep::Animate(transition) => surface.animate_indicator(motion(transition))?,
    }

    transitions.commit(state.transition_to);
    Ok(step)
}

pub fn usb_glyph(status: UsbStatus) -> Glyph {
    match status {
        UsbStatus::Ready => Glyph::UsbReady,
        UsbStatus::NotReady => Glyph::UsbNotReady,
    }
}

pub fn wireless_glyph(status: WirelessStatus) -> Glyph {
    match status {
        WirelessStatus::Open => Glyph::ProfileOpen,
        WirelessStatus::Connected => Glyph::ProfileConnected,
        WirelessStatus::Disconnected => Glyph::ProfileDisconnected,
    }
}

/// "BT1".."BT5" (1-based for humans), or the fallback marker.
pub fn profile_label(number: ProfileNumber) -> String<LABEL_CAPACITY> {
    let mut label = String::new();
    match number {
        ProfileNumber::Slot(index) => {
            let _ = write!(&mut label, "{}{}", BT_LABEL, u16::from(index) + 1);
        }
        ProfileNumber::Invalid => {
            let _ = label.push_str(INVALID_PROFILE_LABEL);
        }
    }
    label
}

/// Where the indicator sits when `side` is active.
pub fn anchor(side: ActiveSide) -> Rectangle {
    match side {
        ActiveSide::Usb => USB_ANCHOR,
        ActiveSide::Wireless => WIRELESS_ANCHOR,
    }
}

pub fn motion(transition: Transition) -> IndicatorMotion {
    IndicatorMotion {
        from: anchor(transition.from),
        to: anchor(transition.to),
        duration_ms: TRANSITION_DURATION_MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{EndpointSnapshot, Transport};
    use crate::status::project;
    use crate::ui::canvas::GraphicsSurface;
    use embedded_graphics::geometry::Point;

    fn widget() -> OutputStatusWidget<GraphicsSurface> {
        OutputStatusWidget::new(Point::zero())
    }

    fn usb_state(ready: bool) -> DisplayState {
        project(&EndpointSnapshot {
            selected_transport: Transport::Usb,
            usb_ready: ready,
            ..EndpointSnapshot::SAFE_DEFAULT
        })
    }

    fn wireless_state(index: u8, bonded: bool, connected: bool) -> DisplayState {
        project(&EndpointSnapshot {
            selected_transport: Transport::Wireless,
            wireless_profile_index: index,
            wireless_profile_bonded: bonded,
            wireless_profile_connected: connected,
            usb_ready: false,
        })
    }

    #[test]
    fn usb_ready_shows_usb_group_only() {
        let mut w = widget();
        apply(&mut w, &usb_state(true)).unwrap();

        let s = w.surface();
        assert!(!s.is_hidden(Element::UsbLabel));
        assert!(!s.is_hidden(Element::UsbStatus));
        assert!(s.is_hidden(Element::WirelessLabel));
        assert!(s.is_hidden(Element::WirelessStatus));
        assert_eq!(s.text(Element::UsbLabel), "USB");
        assert_eq!(s.glyph(Element::UsbStatus), Some(Glyph::UsbReady));
    }

    #[test]
    fn usb_not_ready_uses_not_ready_glyph() {
        let mut w = widget();
        apply(&mut w, &usb_state(false)).unwrap();
        assert_eq!(w.surface().glyph(Element::UsbStatus), Some(Glyph::UsbNotReady));
    }

    #[test]
    fn wireless_shows_one_based_profile_number() {
        let mut w = widget();
        apply(&mut w, &wireless_state(2, true, true)).unwrap();

        let s = w.surface();
        assert!(s.is_hidden(Element::UsbLabel));
        assert!(!s.is_hidden(Element::WirelessLabel));
        assert_eq!(s.text(Element::WirelessLabel), "BT3");
        assert_eq!(s.glyph(Element::WirelessStatus), Some(Glyph::ProfileConnected));
    }

    #[test]
    fn invalid_profile_renders_fallback_label() {
        let mut w = widget();
        apply(&mut w, &wireless_state(7, true, false)).unwrap();
        assert_eq!(w.surface().text(Element::WirelessLabel), "BT?");
        assert_eq!(
            w.surface().glyph(Element::WirelessStatus),
            Some(Glyph::ProfileDisconnected)
        );
    }

    #[test]
    fn wireless_statuses_map_to_distinct_glyphs() {
        let open = wireless_glyph(WirelessStatus::Open);
        let connected = wireless_glyph(WirelessStatus::Connected);
        let disconnected = wireless_glyph(WirelessStatus::Disconnected);
        assert_ne!(open, connected);
        assert_ne!(open, disconnected);
        assert_ne!(connected, disconnected);
    }

    #[test]
    fn first_apply_places_indicator_without_animation() {
        let mut w = widget();
        let step = apply(&mut w, &wireless_state(0, false, false)).unwrap();
        assert_eq!(step, IndicatorStep::Place(ActiveSide::Wireless));
        assert_eq!(w.surface().indicator(), WIRELESS_ANCHOR);
        assert_eq!(w.surface().transitions_started(), 0);
    }

    #[test]
    fn repeated_apply_is_idempotent() {
        let mut w = widget();
        let state = usb_state(true);
        apply(&mut w, &state).unwrap();
        let before = w.surface().clone();

        let step = apply(&mut w, &state).unwrap();
        assert_eq!(step, IndicatorStep::Hold);
        assert_eq!(*w.surface(), before);
    }

    #[test]
    fn side_change_triggers_exactly_one_transition() {
        let mut w = widget();
        apply(&mut w, &usb_state(true)).unwrap();
        let step = apply(&mut w, &wireless_state(0, true, true)).unwrap();
        assert_eq!(
            step,
            IndicatorStep::Animate(Transition {
                from: ActiveSide::Usb,
                to: ActiveSide::Wireless,
            })
        );
        assert_eq!(w.surface().transitions_started(), 1);
    }

    #[test]
    fn profile_change_on_same_side_does_not_animate() {
        let mut w = widget();
        apply(&mut w, &wireless_state(0, true, true)).unwrap();
        apply(&mut w, &wireless_state(1, true, false)).unwrap();
        assert_eq!(w.surface().transitions_started(), 0);
        assert_eq!(w.surface().text(Element::WirelessLabel), "BT2");
    }

    #[test]
    fn failed_apply_leaves_memory_untouched() {
        let mut w = widget();
        apply(&mut w, &usb_state(true)).unwrap();
        w.surface_mut().release();

        let result = apply(&mut w, &wireless_state(0, true, true));
        assert_eq!(result, Err(RenderError::SurfaceGone));
        assert_eq!(w.last_shown_side(), Some(ActiveSide::Usb));
    }

    #[test]
    fn profile_labels() {
        assert_eq!(profile_label(ProfileNumber::Slot(0)).as_str(), "BT1");
        assert_eq!(profile_label(ProfileNumber::Slot(4)).as_str(), "BT5");
        assert_eq!(profile_label(ProfileNumber::Invalid).as_str(), "BT?");
    }

    #[test]
    fn motion_runs_between_side_anchors() {
        let m = motion(Transition {
            from: ActiveSide::Wireless,
            to: ActiveSide::Usb,
        });
        assert_eq!(m.from, WIRELESS_ANCHOR);
        assert_eq!(m.to, USB_ANCHOR);
        assert_eq!(m.duration_ms, TRANSITION_DURATION_MS);
    }
}
