//! Value-change scheduling
//!
//! Posting a value never mutates a signal synchronously. The request goes to a
//! [`Scheduler`]; the network later drains the delta queue and applies all
//! values of one delta step before waking any process, so signals updated in
//! the same step never observe each other's new values early.

use crate::{ProcessId, SignalId, Value};
use indexmap::IndexMap;
use std::fmt;
use std::time::Duration;

/// A requested value for a signal
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub signal: SignalId,
    pub value: Value,
}

impl SignalEvent {
    pub fn new(signal: SignalId, value: Value) -> Self {
        Self { signal, value }
    }
}

/// Who posted a value
///
/// A signal accepts values from one writer per delta step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Writer {
    /// Posted through the network from outside any process
    External,
    Process(ProcessId),
}

impl fmt::Display for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Writer::External => write!(f, "external caller"),
            Writer::Process(id) => write!(f, "{}", id),
        }
    }
}

/// Scheduling service used by `post_new_value`
pub trait Scheduler {
    /// Apply `value` to `signal` at the next delta step
    fn schedule_delta_event(&mut self, signal: SignalId, value: Value);

    /// Apply `value` to `signal` after `delay` of simulated time
    fn schedule_delayed_event(&mut self, signal: SignalId, value: Value, delay: Duration);

    /// Remove and return every event due at the next delta step
    fn take_delta_events(&mut self) -> Vec<SignalEvent>;

    fn has_pending_delta_events(&self) -> bool;

    /// Remove and return every timed event, ordered by delay
    ///
    /// The caller's clock decides when to post them.
    fn take_delayed_events(&mut self) -> Vec<(Duration, SignalEvent)>;
}

/// Delta-step queue with a retained list of timed events
///
/// Within one delta step the latest value posted for a signal wins. Timed
/// events are kept ordered by delay for an external clock to release.
#[derive(Debug, Default)]
pub struct DeltaScheduler {
    delta: IndexMap<SignalId, Value>,
    delayed: Vec<(Duration, SignalEvent)>,
}

impl DeltaScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timed events, ordered by delay
    pub fn delayed_events(&self) -> &[(Duration, SignalEvent)] {
        &self.delayed
    }

    pub fn pending_delta_len(&self) -> usize {
        self.delta.len()
    }
}

impl Scheduler for DeltaScheduler {
    fn schedule_delta_event(&mut self, signal: SignalId, value: Value) {
        if let Some(previous) = self.delta.insert(signal, value) {
            log::trace!("{} overwritten in pending delta (was {})", signal, previous);
        }
    }

    fn schedule_delayed_event(&mut self, signal: SignalId, value: Value, delay: Duration) {
        // stable insert keeps posting order among equal delays
        let pos = self.delayed.partition_point(|(d, _)| *d <= delay);
        self.delayed
            .insert(pos, (delay, SignalEvent::new(signal, value)));
    }

    fn take_delta_events(&mut self) -> Vec<SignalEvent> {
        self.delta
            .drain(..)
            .map(|(signal, value)| SignalEvent::new(signal, value))
            .collect()
    }

    fn has_pending_delta_events(&self) -> bool {
        !self.delta.is_empty()
    }

    fn take_delayed_events(&mut self) -> Vec<(Duration, SignalEvent)> {
        std::mem::take(&mut self.delayed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_latest_value_wins() {
        let mut scheduler = DeltaScheduler::new();
        scheduler.schedule_delta_event(SignalId::new(1), Value::Integer(1));
        scheduler.schedule_delta_event(SignalId::new(2), Value::Integer(2));
        scheduler.schedule_delta_event(SignalId::new(1), Value::Integer(3));
        assert!(scheduler.has_pending_delta_events());
        assert_eq!(scheduler.pending_delta_len(), 2);

        let events = scheduler.take_delta_events();
        assert_eq!(
            events,
            vec![
                SignalEvent::new(SignalId::new(1), Value::Integer(3)),
                SignalEvent::new(SignalId::new(2), Value::Integer(2)),
            ]
        );
        assert!(!scheduler.has_pending_delta_events());
    }

    #[test]
    fn test_delayed_events_ordered() {
        let mut scheduler = DeltaScheduler::new();
        scheduler.schedule_delayed_event(SignalId::new(1), Value::Integer(1), Duration::from_millis(20));
        scheduler.schedule_delayed_event(SignalId::new(2), Value::Integer(2), Duration::from_millis(5));
        scheduler.schedule_delayed_event(SignalId::new(3), Value::Integer(3), Duration::from_millis(20));

        let signals: Vec<_> = scheduler
            .delayed_events()
            .iter()
            .map(|(_, e)| e.signal.raw())
            .collect();
        assert_eq!(signals, vec![2, 1, 3]);
        assert!(!scheduler.has_pending_delta_events());
        assert_eq!(scheduler.take_delayed_events().len(), 3);
        assert!(scheduler.delayed_events().is_empty());
    }
}
