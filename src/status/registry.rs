//! Live widget set used to fan one display state out to every display.
//!
//! Registration is append-only for the lifetime of the registry: widgets
//! are created once at startup and never torn down from here. Handles
//! carry the id of the registry that issued them and resolve nowhere
//! else.

use core::sync::atomic::{AtomicU16, Ordering};

use heapless::Vec;

use super::projector::DisplayState;
use crate::error::{Error, RenderError};
use crate::ui::widget::OutputStatusWidget;

static NEXT_REGISTRY_ID: AtomicU16 = AtomicU16::new(0);

/// Opaque reference to a registered widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetHandle {
    registry: u16,
    index: u8,
}

impl WidgetHandle {
    fn index(self) -> usize {
        self.index as usize
    }
}

/// Outcome of one fan-out pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FanOut {
    pub applied: usize,
    pub failed: usize,
}

pub struct WidgetRegistry<S, const N: usize> {
    id: u16,
    widgets: Vec<OutputStatusWidget<S>, N>,
}

impl<S, const N: usize> Default for WidgetRegistry<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, const N: usize> WidgetRegistry<S, N> {
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            widgets: Vec::new(),
        }
    }

    pub fn register(&mut self, widget: OutputStatusWidget<S>) -> Result<WidgetHandle, Error> {
        let index = u8::try_from(self.widgets.len()).map_err(|_| Error::RegistryFull)?;
        self.widgets.push(widget).map_err(|_| Error::RegistryFull)?;
        Ok(self.handle(index))
    }

    pub fn get(&self, handle: WidgetHandle) -> Option<&OutputStatusWidget<S>> {
        if handle.registry != self.id {
            return None;
        }
        self.widgets.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: WidgetHandle) -> Option<&mut OutputStatusWidget<S>> {
        if handle.registry != self.id {
            return None;
        }
        self.widgets.get_mut(handle.index())
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = WidgetHandle> + '_ {
        // Registration never exceeds u8::MAX entries.
        (0..self.widgets.len()).map(|i| self.handle(i as u8))
    }

    fn handle(&self, index: u8) -> WidgetHandle {
        WidgetHandle {
            registry: self.id,
            index,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputStatusWidget<S>> {
        self.widgets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut OutputStatusWidget<S>> {
        self.widgets.iter_mut()
    }

    /// Apply `state` to every widget. A widget whose visitor fails is
    /// counted and skipped; the rest still get the state.
    pub fn for_each<F>(&mut self, state: &DisplayState, mut visitor: F) -> FanOut
    where
        F: FnMut(&mut OutputStatusWidget<S>, &DisplayState) -> Result<(), RenderError>,
    {
        let mut result = FanOut::default();
        for (_index, widget) in self.widgets.iter_mut().enumerate() {
            match visitor(widget, state) {
                Ok(()) => result.applied += 1,
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Widget {} render failed: {}", _index, _e);
                    result.failed += 1;
                }
            }
        }
        result
    }
}
