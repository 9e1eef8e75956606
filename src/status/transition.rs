//! Per-widget transition memory.
//!
//! Each widget remembers the side it last showed. The indicator animates
//! only on a genuine side change after that side is known; the very first
//! render places it without motion, and substatus-only updates leave it
//! alone.

use super::projector::ActiveSide;

/// Indicator move between two sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: ActiveSide,
    pub to: ActiveSide,
}

/// What the indicator should do for one update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorStep {
    /// Nothing shown yet: place the indicator on this side directly.
    Place(ActiveSide),
    /// Side unchanged: leave the indicator (and any running motion) alone.
    Hold,
    /// Side changed: animate.
    Animate(Transition),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionController {
    last_shown: Option<ActiveSide>,
}

impl TransitionController {
    pub const fn new() -> Self {
        Self { last_shown: None }
    }

    /// Side shown by the last successful render, if any.
    pub fn last_shown(&self) -> Option<ActiveSide> {
        self.last_shown
    }

    /// Decide the indicator step for a render targeting `to`. Does not
    /// update the memory; call [`commit`](Self::commit) once the render
    /// went through.
    pub fn plan(&self, to: ActiveSide) -> IndicatorStep {
        match self.last_shown {
            None => IndicatorStep::Place(to),
            Some(from) if from == to => IndicatorStep::Hold,
            Some(from) => IndicatorStep::Animate(Transition { from, to }),
        }
    }

    pub fn commit(&mut self, shown: ActiveSide) {
        self.last_shown = Some(shown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_render_places_without_animation() {
        let controller = TransitionController::new();
        assert_eq!(controller.last_shown(), None);
        assert_eq!(
            controller.plan(ActiveSide::Wireless),
            IndicatorStep::Place(ActiveSide::Wireless)
        );
    }

    #[test]
    fn same_side_holds() {
        let mut controller = TransitionController::new();
        controller.commit(ActiveSide::Usb);
        assert_eq!(controller.plan(ActiveSide::Usb), IndicatorStep::Hold);
    }

    #[test]
    fn side_change_animates_from_last_shown() {
        let mut controller = TransitionController::new();
        controller.commit(ActiveSide::Usb);
        assert_eq!(
            controller.plan(ActiveSide::Wireless),
            IndicatorStep::Animate(Transition {
                from: ActiveSide::Usb,
                to: ActiveSide::Wireless,
            })
        );
    }

    #[test]
    fn plan_does_not_mutate_memory() {
        let mut controller = TransitionController::new();
        controller.commit(ActiveSide::Usb);
        let _ = controller.plan(ActiveSide::Wireless);
        let _ = controller.plan(ActiveSide::Wireless);
        assert_eq!(controller.last_shown(), Some(ActiveSide::Usb));
    }

    #[test]
    fn commit_moves_the_reference_side() {
        let mut controller = TransitionController::new();
        controller.commit(ActiveSide::Usb);
        controller.commit(ActiveSide::Wireless);
        assert_eq!(controller.plan(ActiveSide::Wireless), IndicatorStep::Hold);
        assert!(matches!(
            controller.plan(ActiveSide::Usb),
            IndicatorStep::Animate(Transition {
                from: ActiveSide::Wireless,
                to: ActiveSide::Usb,
            })
        ));
    }
}
