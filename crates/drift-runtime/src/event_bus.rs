//! Event bus for host events

use crate::event::HostEvent;

/// A simple ordered queue that the host pushes to and the frame loop drains
pub struct EventBus {
    events: Vec<HostEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    /// Drain all events from the bus in push order
    pub fn drain(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_core::FieldId;

    #[test]
    fn test_push_and_drain() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        let field = FieldId::from_raw(1);
        bus.push(HostEvent::PointerMoved { x: 1.0, y: 2.0 });
        bus.push(HostEvent::Impulse {
            field,
            x: 10.0,
            y: 20.0,
        });

        assert_eq!(bus.len(), 2);
        assert!(!bus.is_empty());

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].field(), Some(field));
        assert_eq!(events[0].field(), None);
        assert!(bus.is_empty());
    }
}
