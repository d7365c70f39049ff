//! Observer notifications for structural changes
//!
//! The engine reports every change of the drive topology to a [`Mediator`].
//! Notifications are fire-and-forget and have no effect on the engine. They are
//! queued while a mutation is in progress and dispatched once the network is
//! consistent again.

use crate::{BusId, Identifier, PortId, SignalId};
use std::cell::RefCell;
use std::rc::Rc;

/// A structural change of the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    NewSignal(SignalId),
    NewBus(BusId),
    NewPort {
        port: PortId,
        entity: Identifier,
    },
    PortRemoved(PortId),
    SignalDrivesPort {
        signal: SignalId,
        port: PortId,
        input: usize,
    },
    SignalNoLongerDrivesPort {
        signal: SignalId,
        port: PortId,
        input: usize,
    },
    PortDrivesSignal {
        port: PortId,
        signal: SignalId,
        output: usize,
    },
    PortNoLongerDrivesSignal {
        port: PortId,
        signal: SignalId,
        output: usize,
    },
    BusAttachedToPort {
        bus: BusId,
        port: PortId,
        index: usize,
    },
    BusDetachedFromPort {
        bus: BusId,
        port: PortId,
        index: usize,
    },
    ArchitectureLinked {
        port: PortId,
        architecture: Identifier,
    },
    ArchitectureUnlinked {
        port: PortId,
        architecture: Identifier,
    },
}

/// Receiver of structural notifications
pub trait Mediator {
    fn notify(&mut self, notification: &Notification);
}

/// Mediator that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMediator;

impl Mediator for NullMediator {
    fn notify(&mut self, _notification: &Notification) {}
}

/// Mediator that records notifications into a shared log
///
/// Clones share the same log, so a clone kept outside the network observes
/// everything the network reports.
#[derive(Debug, Clone, Default)]
pub struct RecordingMediator {
    log: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingMediator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all notifications recorded so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.log.borrow().clone()
    }

    /// Number of recorded notifications matching `predicate`
    pub fn count(&self, predicate: impl Fn(&Notification) -> bool) -> usize {
        self.log.borrow().iter().filter(|n| predicate(n)).count()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl Mediator for RecordingMediator {
    fn notify(&mut self, notification: &Notification) {
        self.log.borrow_mut().push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_mediator_shares_log() {
        let observer = RecordingMediator::new();
        let mut mediator = observer.clone();
        mediator.notify(&Notification::NewSignal(SignalId::new(1)));
        mediator.notify(&Notification::NewBus(BusId::new(2)));

        assert_eq!(observer.notifications().len(), 2);
        assert_eq!(
            observer.count(|n| matches!(n, Notification::NewSignal(_))),
            1
        );
        observer.clear();
        assert!(observer.notifications().is_empty());
    }
}
