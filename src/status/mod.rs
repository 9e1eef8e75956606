//! Output status - endpoint snapshot → display state → every widget.
//!
//! [`OutputStatus`] is the event-handling context. It owns the endpoint
//! source and the widget registry; the host delivers notifications to
//! [`OutputStatus::handle_event`] from a single task, so neither needs a
//! lock.

pub mod projector;
pub mod registry;
pub mod transition;

pub use projector::{project, ActiveSide, DisplayState, ProfileNumber, UsbStatus, WirelessStatus};
pub use registry::{FanOut, WidgetHandle, WidgetRegistry};
pub use transition::{IndicatorStep, Transition, TransitionController};

use crate::endpoint::{EndpointEvent, EndpointSource, Subscribe};
use crate::error::Error;
use crate::ui::widget::OutputStatusWidget;
use crate::ui::StatusSurface;

pub struct OutputStatus<E, S, const N: usize> {
    source: E,
    registry: WidgetRegistry<S, N>,
}

impl<E, S, const N: usize> OutputStatus<E, S, N>
where
    E: EndpointSource,
    S: StatusSurface,
{
    /// Topics the widget reacts to.
    pub const SUBSCRIPTIONS: [EndpointEvent; 3] = EndpointEvent::ALL;

    pub fn new(source: E) -> Self {
        Self {
            source,
            registry: WidgetRegistry::new(),
        }
    }

    /// Register interest in every topic the widget depends on.
    pub fn subscribe<B: Subscribe + ?Sized>(bus: &mut B) {
        for topic in Self::SUBSCRIPTIONS {
            bus.subscribe(topic);
        }
    }

    pub fn source(&self) -> &E {
        &self.source
    }

    /// Build a widget under `parent`, register it and show the current
    /// status on it (first render, no animation).
    pub fn init_widget(&mut self, parent: S::Parent) -> Result<WidgetHandle, Error> {
        let handle = self.registry.register(OutputStatusWidget::new(parent))?;
        let state = self.current_state();

        if let Some(widget) = self.registry.get_mut(handle) {
            // Registered regardless; the next event retries the render.
            if let Err(_e) = widget.apply(&state) {
                #[cfg(feature = "defmt")]
                defmt::warn!("Initial render of widget {} failed: {}", handle, _e);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::info!("Output status widget {} registered", handle);
        Ok(handle)
    }

    /// Surface of a registered widget, for embedding it in a layout.
    pub fn get_widget_surface(&self, handle: WidgetHandle) -> Option<&S> {
        self.registry.get(handle).map(OutputStatusWidget::surface)
    }

    /// Mutable surface access for the toolkit (animation ticks, teardown).
    pub fn widget_surface_mut(&mut self, handle: WidgetHandle) -> Option<&mut S> {
        self.registry.get_mut(handle).map(OutputStatusWidget::surface_mut)
    }

    /// Every registered surface, in registration order.
    pub fn surfaces(&self) -> impl Iterator<Item = &S> {
        self.registry.iter().map(OutputStatusWidget::surface)
    }

    pub fn surfaces_mut(&mut self) -> impl Iterator<Item = &mut S> {
        self.registry.iter_mut().map(OutputStatusWidget::surface_mut)
    }

    pub fn widget(&self, handle: WidgetHandle) -> Option<&OutputStatusWidget<S>> {
        self.registry.get(handle)
    }

    pub fn widgets(&self) -> &WidgetRegistry<S, N> {
        &self.registry
    }

    /// Project the source as it is right now.
    pub fn current_state(&self) -> DisplayState {
        project(&self.source.snapshot())
    }

    /// React to one notification by recomputing from current truth.
    pub fn handle_event(&mut self, _event: EndpointEvent) -> FanOut {
        #[cfg(feature = "defmt")]
        defmt::debug!("Output status update on {}", _event);
        self.refresh()
    }

    /// Re-render every widget from current truth.
    pub fn refresh(&mut self) -> FanOut {
        let state = self.current_state();
        self.registry
            .for_each(&state, |widget, state| widget.apply(state).map(|_| ()))
    }
}
