//! Process-wide event queue access

use super::{Event, EventType};
use crate::backend::Backend;
use crate::core::subsystems::Subsystems;
use crate::error::{Error, Result};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

/// Handle to the shared FIFO event queue
///
/// Cheap to clone. Every clone talks to the same queue.
#[derive(Clone)]
pub struct EventQueue {
    backend: Arc<dyn Backend>,
}

impl EventQueue {
    /// Access the event queue of an initialized session
    pub fn new(subsystems: &Subsystems) -> Self {
        Self {
            backend: subsystems.backend(),
        }
    }

    /// Take the next event without blocking
    pub fn poll(&self) -> Option<Event> {
        self.backend.poll_event()
    }

    /// Wait for the next event
    ///
    /// `None` waits indefinitely. The timeout is best effort: the actual wait may
    /// exceed it depending on the host scheduler.
    pub fn wait(&self, timeout: Option<Duration>) -> Option<Event> {
        self.backend.wait_event(timeout)
    }

    /// Append an event; returns false if it was filtered out
    pub fn push(&self, event: Event) -> bool {
        let accepted = self.backend.push_event(event);
        log::trace!("Pushed {:?} (accepted: {})", event.event_type(), accepted);
        accepted
    }

    /// Append several events, returning how many were accepted
    pub fn push_many<I>(&self, events: I) -> usize
    where
        I: IntoIterator<Item = Event>,
    {
        events.into_iter().filter(|event| self.push(*event)).count()
    }

    /// Copy up to `max` queued events in `range` without removing them
    pub fn peek(&self, max: usize, range: RangeInclusive<EventType>) -> Result<Vec<Event>> {
        let (min, max_type) = check_range(range)?;
        Ok(self.backend.peek_events(max, min, max_type))
    }

    /// Remove and return up to `max` queued events in `range`
    pub fn retrieve(&self, max: usize, range: RangeInclusive<EventType>) -> Result<Vec<Event>> {
        let (min, max_type) = check_range(range)?;
        Ok(self.backend.retrieve_events(max, min, max_type))
    }

    /// Drop every queued event in `range`
    pub fn flush(&self, range: RangeInclusive<EventType>) -> Result<()> {
        let (min, max) = check_range(range)?;
        self.backend.flush_events(min, max);
        Ok(())
    }

    /// Drop every queued event
    pub fn flush_all(&self) {
        self.backend.flush_events(EventType::First, EventType::Last);
    }

    /// Start delivering events of `event_type`
    pub fn enable(&self, event_type: EventType) {
        self.backend.set_event_enabled(event_type, true);
    }

    /// Stop delivering events of `event_type`; queued ones are dropped
    pub fn disable(&self, event_type: EventType) {
        self.backend.set_event_enabled(event_type, false);
    }

    /// Whether events of `event_type` are delivered
    pub fn is_enabled(&self, event_type: EventType) -> bool {
        self.backend.event_enabled(event_type)
    }

    /// Whether an event of `event_type` is queued
    pub fn has(&self, event_type: EventType) -> bool {
        self.backend.has_events(event_type, event_type)
    }

    /// Whether any event in `range` is queued
    pub fn has_range(&self, range: RangeInclusive<EventType>) -> Result<bool> {
        let (min, max) = check_range(range)?;
        Ok(self.backend.has_events(min, max))
    }

    /// Gather pending device input into the queue
    pub fn pump(&self) {
        self.backend.pump_events();
    }
}

fn check_range(range: RangeInclusive<EventType>) -> Result<(EventType, EventType)> {
    let (min, max) = range.into_inner();
    if min > max {
        return Err(Error::ArgumentRange {
            name: "range",
            reason: format!("{min:?} is after {max:?}"),
        });
    }
    Ok((min, max))
}
