//! One status widget instance: its surface plus the side it last showed.

use super::{render, StatusSurface};
use crate::error::RenderError;
use crate::status::{ActiveSide, DisplayState, IndicatorStep, TransitionController};

pub struct OutputStatusWidget<S> {
    surface: S,
    transitions: TransitionController,
}

impl<S: StatusSurface> OutputStatusWidget<S> {
    /// Build the element tree under `parent`. Nothing is shown as active
    /// until the first [`apply`](Self::apply).
    pub fn new(parent: S::Parent) -> Self {
        Self::from_surface(S::create(parent))
    }
}

impl<S> OutputStatusWidget<S> {
    pub fn from_surface(surface: S) -> Self {
        Self {
            surface,
            transitions: TransitionController::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn last_shown_side(&self) -> Option<ActiveSide> {
        self.transitions.last_shown()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut S, &mut TransitionController) {
        (&mut self.surface, &mut self.transitions)
    }
}

impl<S: StatusSurface> OutputStatusWidget<S> {
    pub fn apply(&mut self, state: &DisplayState) -> Result<IndicatorStep, RenderError> {
        render::apply(self, state)
    }
}
