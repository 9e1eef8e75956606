//! Endpoint change notifications and the subscription capability.
//!
//! Notifications carry no payload: whoever handles one re-reads the
//! current state, so a burst of events in any order converges on the
//! same result.

/// A change in the endpoint subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndpointEvent {
    /// The selected output transport changed.
    EndpointChanged,
    /// The active wireless profile, or its bond/connection, changed.
    ActiveProfileChanged,
    /// The USB connection state changed.
    UsbConnStateChanged,
}

impl EndpointEvent {
    pub const ALL: [EndpointEvent; 3] = [
        EndpointEvent::EndpointChanged,
        EndpointEvent::ActiveProfileChanged,
        EndpointEvent::UsbConnStateChanged,
    ];

    const fn bit(self) -> u8 {
        match self {
            EndpointEvent::EndpointChanged => 1 << 0,
            EndpointEvent::ActiveProfileChanged => 1 << 1,
            EndpointEvent::UsbConnStateChanged => 1 << 2,
        }
    }
}

/// Capability to register interest in a notification topic.
pub trait Subscribe {
    fn subscribe(&mut self, topic: EndpointEvent);
}

/// Set of subscribed topics, used by the dispatcher to drop events
/// nobody listens to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TopicSet(u8);

impl TopicSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(&self, topic: EndpointEvent) -> bool {
        self.0 & topic.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Subscribe for TopicSet {
    fn subscribe(&mut self, topic: EndpointEvent) {
        self.0 |= topic.bit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_contains_nothing() {
        let topics = TopicSet::empty();
        assert!(topics.is_empty());
        for topic in EndpointEvent::ALL {
            assert!(!topics.contains(topic));
        }
    }

    #[test]
    fn subscribe_is_per_topic() {
        let mut topics = TopicSet::empty();
        topics.subscribe(EndpointEvent::UsbConnStateChanged);
        assert!(topics.contains(EndpointEvent::UsbConnStateChanged));
        assert!(!topics.contains(EndpointEvent::EndpointChanged));
        assert!(!topics.contains(EndpointEvent::ActiveProfileChanged));
    }

    #[test]
    fn subscribing_twice_is_harmless() {
        let mut once = TopicSet::empty();
        once.subscribe(EndpointEvent::EndpointChanged);
        let mut twice = once;
        twice.subscribe(EndpointEvent::EndpointChanged);
        assert_eq!(once, twice);
    }
}
