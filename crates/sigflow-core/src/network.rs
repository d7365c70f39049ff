//! The network: arena owning signals, buses, ports and processes
//!
//! All relations between nodes are stored as ids, never as owning pointers.
//! Collaborators (library, mediator, scheduler, scanner) are injected at
//! construction.

use crate::{
    port::TagCounter, Bus, BusId, DeltaScheduler, Error, Identifier, Library, Mediator,
    NetworkConfig, Notification, NullMediator, Port, PortId, ProcessId, Result, Scanner,
    Scheduler, Signal, SignalEvent, SignalId, UpstreamScanner, Value, Writer,
};
use crate::process::ProcessSlot;
use indexmap::IndexMap;
use std::time::Duration;

/// Target of a dependency query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    Signal(SignalId),
    Port(PortId),
    Entity(Identifier),
}

/// Arena-backed dataflow graph
///
/// # Example
///
/// ```
/// use sigflow_core::{ArchitectureTable, Network};
///
/// let mut network = Network::with_library(Box::new(ArchitectureTable::new()));
/// let a = network.create_signal_with_value("a", 3i64);
/// assert_eq!(network.signal(a).unwrap().label(), "a");
/// assert!(!network.signal(a).unwrap().is_driven());
/// ```
pub struct Network {
    pub(crate) config: NetworkConfig,
    pub(crate) signals: IndexMap<SignalId, Signal>,
    pub(crate) buses: IndexMap<BusId, Bus>,
    pub(crate) ports: IndexMap<PortId, Port>,
    pub(crate) processes: IndexMap<ProcessId, ProcessSlot>,
    next_signal: u64,
    next_bus: u64,
    next_port: u64,
    next_process: u64,
    pub(crate) tags: TagCounter,
    pending: Vec<Notification>,
    delta_writers: IndexMap<SignalId, Writer>,
    library: Box<dyn Library>,
    mediator: Box<dyn Mediator>,
    scheduler: Box<dyn Scheduler>,
    scanner: Box<dyn Scanner>,
}

impl Network {
    /// Create a network with explicit collaborators
    pub fn new(
        config: NetworkConfig,
        library: Box<dyn Library>,
        mediator: Box<dyn Mediator>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        Self {
            config,
            signals: IndexMap::new(),
            buses: IndexMap::new(),
            ports: IndexMap::new(),
            processes: IndexMap::new(),
            next_signal: 0,
            next_bus: 0,
            next_port: 0,
            next_process: 0,
            tags: TagCounter::default(),
            pending: Vec::new(),
            delta_writers: IndexMap::new(),
            library,
            mediator,
            scheduler,
            scanner: Box::new(UpstreamScanner),
        }
    }

    /// Create a network with default config, no-op mediator and delta scheduler
    pub fn with_library(library: Box<dyn Library>) -> Self {
        Self::new(
            NetworkConfig::default(),
            library,
            Box::new(NullMediator),
            Box::new(DeltaScheduler::new()),
        )
    }

    /// Replace the scanner used by dependency queries
    pub fn with_scanner(mut self, scanner: Box<dyn Scanner>) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut NetworkConfig {
        &mut self.config
    }

    pub fn library(&self) -> &dyn Library {
        self.library.as_ref()
    }

    // ---------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------

    /// Create an unbound signal without a value
    pub fn create_signal(&mut self, label: impl Into<String>) -> SignalId {
        let id = self.allocate_signal(label);
        self.flush_notifications();
        id
    }

    /// Create an unbound signal with an initial value
    pub fn create_signal_with_value(
        &mut self,
        label: impl Into<String>,
        value: impl Into<Value>,
    ) -> SignalId {
        let id = self.allocate_signal(label);
        if let Some(signal) = self.signals.get_mut(&id) {
            signal.initialize_value(Some(value.into()));
        }
        self.flush_notifications();
        id
    }

    pub(crate) fn allocate_signal(&mut self, label: impl Into<String>) -> SignalId {
        let id = SignalId::new(self.next_signal);
        self.next_signal += 1;
        self.signals.insert(id, Signal::new(id, label));
        self.pending.push(Notification::NewSignal(id));
        id
    }

    /// Create a bus without a value
    pub fn create_bus(&mut self, label: impl Into<String>) -> BusId {
        let id = BusId::new(self.next_bus);
        self.next_bus += 1;
        self.buses.insert(id, Bus::new(id, label));
        self.pending.push(Notification::NewBus(id));
        self.flush_notifications();
        id
    }

    pub(crate) fn allocate_port_id(&mut self) -> PortId {
        let id = PortId::new(self.next_port);
        self.next_port += 1;
        id
    }

    pub(crate) fn allocate_process_id(&mut self) -> ProcessId {
        let id = ProcessId::new(self.next_process);
        self.next_process += 1;
        id
    }

    /// Remove a signal that is neither driven nor feeding any port
    pub fn remove_signal(&mut self, id: SignalId) -> Result<Signal> {
        let signal = self.signal(id)?;
        if signal.is_driven() || !signal.fan_out().is_empty() {
            return Err(Error::invalid(format!("{} is still bound to a port", id)));
        }
        for slot in self.processes.values_mut() {
            slot.forget_signal(id);
        }
        self.signals
            .shift_remove(&id)
            .ok_or(Error::SignalNotFound(id))
    }

    /// Remove a bus that is not attached to any port
    pub fn remove_bus(&mut self, id: BusId) -> Result<Bus> {
        if self.bus(id)?.is_attached() {
            return Err(Error::invalid(format!("{} is still attached to a port", id)));
        }
        self.buses.shift_remove(&id).ok_or(Error::BusNotFound(id))
    }

    pub fn signal(&self, id: SignalId) -> Result<&Signal> {
        self.signals.get(&id).ok_or(Error::SignalNotFound(id))
    }

    /// Mutable access to descriptive signal state (label, hold, properties)
    pub fn signal_mut(&mut self, id: SignalId) -> Result<&mut Signal> {
        self.signals.get_mut(&id).ok_or(Error::SignalNotFound(id))
    }

    pub fn bus(&self, id: BusId) -> Result<&Bus> {
        self.buses.get(&id).ok_or(Error::BusNotFound(id))
    }

    pub fn bus_mut(&mut self, id: BusId) -> Result<&mut Bus> {
        self.buses.get_mut(&id).ok_or(Error::BusNotFound(id))
    }

    pub fn port(&self, id: PortId) -> Result<&Port> {
        self.ports.get(&id).ok_or(Error::PortNotFound(id))
    }

    pub(crate) fn port_mut(&mut self, id: PortId) -> Result<&mut Port> {
        self.ports.get_mut(&id).ok_or(Error::PortNotFound(id))
    }

    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.signals.values()
    }

    pub fn buses(&self) -> impl Iterator<Item = &Bus> {
        self.buses.values()
    }

    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Current value of a signal
    pub fn value(&self, id: SignalId) -> Result<Option<&Value>> {
        Ok(self.signal(id)?.value())
    }

    /// Write a bus value directly
    pub fn set_bus_value(&mut self, id: BusId, value: Option<Value>) -> Result<()> {
        self.bus_mut(id)?.set_value(value);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Values
    // ---------------------------------------------------------------

    /// Request `value` for `signal` at the next delta step
    ///
    /// Fails if a process already posted to `signal` in the pending step.
    pub fn post_new_value(&mut self, signal: SignalId, value: impl Into<Value>) -> Result<()> {
        self.schedule_delta(Writer::External, signal, value.into())
    }

    pub(crate) fn schedule_delta(
        &mut self,
        writer: Writer,
        signal: SignalId,
        value: Value,
    ) -> Result<()> {
        self.signal(signal)?;
        if let Some(&previous) = self.delta_writers.get(&signal) {
            if previous != writer {
                log::warn!(
                    "{} posted by both {} and {} in one delta step",
                    signal,
                    previous,
                    writer
                );
                return Err(Error::invalid(format!(
                    "{} already has a pending value from {}",
                    signal, previous
                )));
            }
        }
        self.delta_writers.insert(signal, writer);
        self.scheduler.schedule_delta_event(signal, value);
        Ok(())
    }

    /// Request `value` for `signal` after `delay`
    pub fn post_new_value_delayed(
        &mut self,
        signal: SignalId,
        value: impl Into<Value>,
        delay: Duration,
    ) -> Result<()> {
        self.signal(signal)?;
        self.scheduler
            .schedule_delayed_event(signal, value.into(), delay);
        Ok(())
    }

    pub fn has_pending_values(&self) -> bool {
        self.scheduler.has_pending_delta_events()
    }

    /// Hand every timed event to the caller's clock, ordered by delay
    pub fn take_delayed_events(&mut self) -> Vec<(Duration, SignalEvent)> {
        self.scheduler.take_delayed_events()
    }

    /// Apply one delta step
    ///
    /// Every value of the step is written before any sensitive process runs.
    /// Returns the number of signals whose change woke their subscribers.
    pub fn run_delta_cycle(&mut self) -> Result<usize> {
        let events = self.scheduler.take_delta_events();
        self.delta_writers.clear();
        if events.is_empty() {
            return Ok(0);
        }

        let mut changed = Vec::with_capacity(events.len());
        for event in events {
            match self.signals.get_mut(&event.signal) {
                Some(signal) => {
                    if signal.apply_value(event.value) || self.config.notify_unchanged_values() {
                        changed.push(event.signal);
                    }
                }
                None => log::warn!("dropping value posted to removed {}", event.signal),
            }
        }
        log::trace!("delta step applied, {} signals changed", changed.len());

        // every subscriber is woken even if an earlier one fails
        let mut failure = None;
        for signal in &changed {
            if let Err(err) = self.on_value_changed(*signal) {
                failure.get_or_insert(err);
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(changed.len()),
        }
    }

    /// Run delta steps until no values are pending
    ///
    /// Returns the number of steps executed.
    pub fn run_until_stable(&mut self) -> Result<usize> {
        let limit = self.config.max_delta_cycles();
        let mut cycles = 0;
        while self.scheduler.has_pending_delta_events() {
            if cycles >= limit {
                return Err(Error::DeltaCycleLimitExceeded(limit));
            }
            self.run_delta_cycle()?;
            cycles += 1;
        }
        Ok(cycles)
    }

    fn on_value_changed(&mut self, signal: SignalId) -> Result<()> {
        let subscribers = match self.signals.get(&signal) {
            Some(s) => s.subscribers().to_vec(),
            None => return Ok(()),
        };
        let mut failure = None;
        for process in subscribers {
            // an earlier action in this step may have unregistered it
            if !self.processes.contains_key(&process) {
                continue;
            }
            if let Err(err) = self.invoke_process(process, false, Some(signal)) {
                log::warn!("{} failed on change of {}: {}", process, signal, err);
                failure.get_or_insert(err);
            }
        }
        failure.map_or(Ok(()), Err)
    }

    // ---------------------------------------------------------------
    // Dependencies
    // ---------------------------------------------------------------

    /// Would changing `target` eventually change `signal`?
    ///
    /// Walks the driving chain upstream of `signal`, stopping at source and
    /// held signals.
    pub fn depends_on(&self, signal: SignalId, target: &Dependency) -> Result<bool> {
        self.signal(signal)?;
        let scanner = self.scanner.as_ref();
        Ok(match target {
            Dependency::Signal(other) => {
                scanner.exists_signal(self, signal, &|s| s.id() == *other, false)
            }
            Dependency::Port(port) => {
                scanner.exists_port(self, signal, &|p| p.id() == *port, false)
            }
            Dependency::Entity(entity) => {
                scanner.exists_port(self, signal, &|p| p.entity().id() == entity, false)
            }
        })
    }

    // ---------------------------------------------------------------
    // Architectures
    // ---------------------------------------------------------------

    pub fn has_architecture_link(&self, port: PortId) -> Result<bool> {
        Ok(self.port(port)?.has_architecture_link())
    }

    /// Make sure a usable architecture is linked to `port`
    ///
    /// A no-op if the current architecture still supports the port; otherwise
    /// one lookup is attempted. Returns whether an architecture is linked.
    pub fn ensure_architecture_link(&mut self, port: PortId) -> Result<bool> {
        let current = self.port(port)?;
        if !current.is_completely_connected() {
            return Ok(false);
        }
        if let Some(architecture) = current.architecture() {
            if architecture.supports_port(current) {
                return Ok(true);
            }
        }
        let linked = self.relink_architecture(port, true);
        self.flush_notifications();
        linked
    }

    /// Unlink and unregister the architecture of `port`, if any
    pub fn remove_linked_architecture(&mut self, port: PortId) -> Result<()> {
        let result = self.unlink_architecture(port);
        self.flush_notifications();
        result
    }

    /// Move the architecture linked to `from` onto `to` without a lookup
    ///
    /// `to` must be completely connected, unlinked and supported by the
    /// architecture; otherwise nothing changes and `Ok(false)` is returned.
    pub fn move_architecture(&mut self, from: PortId, to: PortId) -> Result<bool> {
        let target = self.port(to)?;
        if from == to {
            return Ok(target.has_architecture_link());
        }
        if !target.is_completely_connected() || target.has_architecture_link() {
            return Ok(false);
        }
        let mut architecture = self
            .port_mut(from)?
            .architecture
            .take()
            .ok_or(Error::ArchitectureNotLinked(from))?;

        if !architecture.supports_port(self.port(to)?) {
            self.port_mut(from)?.architecture = Some(architecture);
            return Ok(false);
        }

        let id = architecture.id().clone();
        match architecture.rebind_to_port_if_supported(self, to) {
            Ok(true) => {
                log::debug!("moved architecture {} from {} to {}", id, from, to);
                self.port_mut(to)?.architecture = Some(architecture);
                self.pending.push(Notification::ArchitectureUnlinked {
                    port: from,
                    architecture: id.clone(),
                });
                self.pending.push(Notification::ArchitectureLinked {
                    port: to,
                    architecture: id,
                });
                self.flush_notifications();
                Ok(true)
            }
            Ok(false) => {
                self.port_mut(from)?.architecture = Some(architecture);
                Ok(false)
            }
            Err(err) => {
                log::warn!("dropping architecture {} after failed move: {}", id, err);
                self.pending.push(Notification::ArchitectureUnlinked {
                    port: from,
                    architecture: id,
                });
                self.flush_notifications();
                Err(err)
            }
        }
    }

    /// Evaluate the architecture linked to `port` and settle the network
    ///
    /// Returns the port's output signals.
    pub fn execute_mathematical_operator(&mut self, port: PortId) -> Result<Vec<SignalId>> {
        let mut architecture = self
            .port_mut(port)?
            .architecture
            .take()
            .ok_or(Error::ArchitectureNotLinked(port))?;
        let result = architecture.execute_mathematical_operator(self);
        self.port_mut(port)?.architecture = Some(architecture);
        result?;
        self.run_until_stable()?;
        Ok(self.port(port)?.output_signals().collect())
    }

    /// Keep, refresh or replace the architecture after a binding change
    ///
    /// A still-supporting architecture is re-registered against the port's
    /// current signals without reinstantiation. Otherwise it is dropped and,
    /// if `lookup` is set, the library is queried for a replacement.
    pub(crate) fn relink_architecture(&mut self, port: PortId, lookup: bool) -> Result<bool> {
        if let Some(mut architecture) = self.port_mut(port)?.architecture.take() {
            let supported = architecture.supports_port(self.port(port)?);
            let mut result = architecture.unregister_architecture(self);
            if supported && result.is_ok() {
                result = architecture.register_architecture(self);
                if result.is_ok() {
                    self.port_mut(port)?.architecture = Some(architecture);
                    return Ok(true);
                }
            }
            log::debug!("{} no longer serves {}", architecture.id(), port);
            self.pending.push(Notification::ArchitectureUnlinked {
                port,
                architecture: architecture.id().clone(),
            });
            result?;
        }
        if !lookup {
            return Ok(false);
        }
        self.link_from_library(port)
    }

    fn link_from_library(&mut self, port_id: PortId) -> Result<bool> {
        let mut instance = {
            let port = self.port(port_id)?;
            if !self.library.contains_architecture(port) {
                log::debug!("no architecture found for {}", port);
                return Ok(false);
            }
            match self.library.lookup_architecture(port) {
                Some(template) => template.instantiate_to_port(port),
                None => return Ok(false),
            }
        };
        instance.register_architecture(self)?;
        log::debug!("linked architecture {} to {}", instance.id(), port_id);
        self.pending.push(Notification::ArchitectureLinked {
            port: port_id,
            architecture: instance.id().clone(),
        });
        self.port_mut(port_id)?.architecture = Some(instance);
        Ok(true)
    }

    pub(crate) fn unlink_architecture(&mut self, port: PortId) -> Result<()> {
        if let Some(mut architecture) = self.port_mut(port)?.architecture.take() {
            let result = architecture.unregister_architecture(self);
            log::debug!("unlinked architecture {} from {}", architecture.id(), port);
            self.pending.push(Notification::ArchitectureUnlinked {
                port,
                architecture: architecture.id().clone(),
            });
            result?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------

    pub(crate) fn queue_notification(&mut self, notification: Notification) {
        self.pending.push(notification);
    }

    /// Dispatch queued notifications to the mediator
    pub(crate) fn flush_notifications(&mut self) {
        for notification in std::mem::take(&mut self.pending) {
            self.mediator.notify(&notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{relay_entity, relay_library, test_network};
    use crate::{PortBindings, RecordingMediator};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_create_nodes() {
        let (mut network, mediator) = test_network();
        let a = network.create_signal("a");
        let b = network.create_signal_with_value("b", 4i64);
        let bus = network.create_bus("clock");

        assert_eq!(network.signal_count(), 2);
        assert_eq!(network.bus_count(), 1);
        assert!(network.value(a).unwrap().is_none());
        assert_eq!(network.value(b).unwrap(), Some(&Value::Integer(4)));
        assert_eq!(network.bus(bus).unwrap().label(), "clock");
        assert_eq!(
            mediator.notifications(),
            vec![
                Notification::NewSignal(a),
                Notification::NewSignal(b),
                Notification::NewBus(bus)
            ]
        );
    }

    #[test]
    fn test_unknown_ids() {
        let (mut network, _) = test_network();
        assert!(matches!(
            network.signal(SignalId::new(99)),
            Err(Error::SignalNotFound(_))
        ));
        assert!(matches!(
            network.port(PortId::new(99)),
            Err(Error::PortNotFound(_))
        ));
        assert!(network.post_new_value(SignalId::new(99), 1i64).is_err());
    }

    #[test]
    fn test_post_new_value_is_deferred() {
        let (mut network, _) = test_network();
        let a = network.create_signal("a");
        network.post_new_value(a, 5i64).unwrap();
        assert!(network.value(a).unwrap().is_none());
        assert!(network.has_pending_values());

        assert_eq!(network.run_until_stable().unwrap(), 1);
        assert_eq!(network.value(a).unwrap(), Some(&Value::Integer(5)));
        assert!(!network.has_pending_values());
    }

    #[test]
    fn test_remove_signal_requires_unbound() {
        let (mut network, _) = test_network();
        let a = network.create_signal("a");
        let port = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([a]))
            .unwrap();
        assert!(network.remove_signal(a).is_err());

        network.remove_input_signal_binding(port, 0).unwrap();
        let removed = network.remove_signal(a).unwrap();
        assert_eq!(removed.id(), a);
        assert!(network.signal(a).is_err());
    }

    #[test]
    fn test_second_writer_in_one_step_is_rejected() {
        let (mut network, _) = test_network();
        let a = network.create_signal("a");
        let port = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([a]))
            .unwrap();
        let out = network.port(port).unwrap().output(0).unwrap();

        network.post_new_value(a, 1i64).unwrap();
        network.post_new_value(a, 2i64).unwrap();
        network.run_delta_cycle().unwrap();

        // the relay process already posted to `out` for the next step
        assert!(matches!(
            network.post_new_value(out, 5i64),
            Err(Error::ArgumentInvalid(_))
        ));
        network.run_delta_cycle().unwrap();
        assert_eq!(network.value(out).unwrap(), Some(&Value::Integer(2)));

        network.post_new_value(out, 5i64).unwrap();
        network.run_delta_cycle().unwrap();
        assert_eq!(network.value(out).unwrap(), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_delayed_events_handed_to_caller() {
        let (mut network, _) = test_network();
        let a = network.create_signal("a");
        network
            .post_new_value_delayed(a, 1i64, Duration::from_millis(10))
            .unwrap();
        network
            .post_new_value_delayed(a, 2i64, Duration::from_millis(5))
            .unwrap();
        assert!(!network.has_pending_values());

        let events = network.take_delayed_events();
        assert_eq!(
            events,
            vec![
                (Duration::from_millis(5), SignalEvent::new(a, Value::Integer(2))),
                (Duration::from_millis(10), SignalEvent::new(a, Value::Integer(1))),
            ]
        );
        assert!(network.take_delayed_events().is_empty());

        for (_, event) in events {
            network.post_new_value(event.signal, event.value).unwrap();
            network.run_until_stable().unwrap();
        }
        assert_eq!(network.value(a).unwrap(), Some(&Value::Integer(1)));
    }

    #[derive(Debug)]
    struct StickyArchitecture {
        state: crate::ArchitectureState,
        fail: Rc<Cell<bool>>,
    }

    impl crate::Architecture for StickyArchitecture {
        fn state(&self) -> &crate::ArchitectureState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut crate::ArchitectureState {
            &mut self.state
        }

        fn instantiate_to_port(&self, port: &Port) -> Box<dyn crate::Architecture> {
            Box::new(StickyArchitecture {
                state: self.state.instance(port.id()),
                fail: self.fail.clone(),
            })
        }

        fn register_architecture(&mut self, _network: &mut Network) -> Result<()> {
            Ok(())
        }

        fn unregister_architecture(&mut self, _network: &mut Network) -> Result<()> {
            if self.fail.get() {
                return Err(Error::unsupported("sticky architecture"));
            }
            Ok(())
        }
    }

    fn sticky_network() -> (Network, RecordingMediator, Rc<Cell<bool>>) {
        let fail = Rc::new(Cell::new(false));
        let library = crate::ArchitectureTable::new().with(Box::new(StickyArchitecture {
            state: crate::ArchitectureState::template(
                Identifier::new("Sticky", "Test"),
                relay_entity().id().clone(),
            ),
            fail: fail.clone(),
        }));
        let mediator = RecordingMediator::new();
        let network = Network::new(
            NetworkConfig::default(),
            Box::new(library),
            Box::new(mediator.clone()),
            Box::new(DeltaScheduler::new()),
        );
        (network, mediator, fail)
    }

    fn unlinked_count(mediator: &RecordingMediator) -> usize {
        mediator.count(|n| matches!(n, Notification::ArchitectureUnlinked { .. }))
    }

    #[test]
    fn test_failed_unregister_still_reports_unlink() {
        let (mut network, mediator, fail) = sticky_network();
        let a = network.create_signal("a");
        let b = network.create_signal("b");
        let port = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([a]))
            .unwrap();
        assert!(network.has_architecture_link(port).unwrap());

        fail.set(true);
        assert!(network.replace_input_signal_binding(port, 0, b).is_err());
        assert!(!network.has_architecture_link(port).unwrap());
        assert_eq!(unlinked_count(&mediator), 1);

        fail.set(false);
        assert!(network.ensure_architecture_link(port).unwrap());
        fail.set(true);
        assert!(network.remove_input_signal_binding(port, 0).is_err());
        assert!(!network.has_architecture_link(port).unwrap());
        assert_eq!(unlinked_count(&mediator), 2);
    }

    #[test]
    fn test_failed_move_reports_unlink() {
        let (mut network, mediator, fail) = sticky_network();
        let a = network.create_signal("a");
        let from = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([a]))
            .unwrap();
        network.config_mut().set_auto_link_architectures(false);
        let to = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([a]))
            .unwrap();
        assert!(!network.has_architecture_link(to).unwrap());

        fail.set(true);
        assert!(network.move_architecture(from, to).is_err());
        assert!(!network.has_architecture_link(from).unwrap());
        assert!(!network.has_architecture_link(to).unwrap());
        assert_eq!(unlinked_count(&mediator), 1);
    }

    #[test]
    fn test_depends_on() {
        let (mut network, _) = test_network();
        let a = network.create_signal("a");
        let first = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([a]))
            .unwrap();
        let mid = network.port(first).unwrap().output(0).unwrap();
        let second = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([mid]))
            .unwrap();
        let out = network.port(second).unwrap().output(0).unwrap();

        assert!(network.depends_on(out, &Dependency::Signal(a)).unwrap());
        assert!(network.depends_on(out, &Dependency::Signal(mid)).unwrap());
        assert!(network.depends_on(out, &Dependency::Port(first)).unwrap());
        assert!(network
            .depends_on(out, &Dependency::Entity(relay_entity().id().clone()))
            .unwrap());
        assert!(!network.depends_on(a, &Dependency::Signal(out)).unwrap());
        assert!(!network.depends_on(out, &Dependency::Signal(out)).unwrap());

        // a driven signal marked as source cuts the walk
        network.set_source_signal(mid, true).unwrap();
        assert!(!network.depends_on(out, &Dependency::Signal(a)).unwrap());
        assert!(network.depends_on(out, &Dependency::Signal(mid)).unwrap());
    }

    #[test]
    fn test_network_with_recording_mediator() {
        let mediator = RecordingMediator::new();
        let network = Network::new(
            NetworkConfig::default(),
            Box::new(relay_library()),
            Box::new(mediator.clone()),
            Box::new(DeltaScheduler::new()),
        );
        assert_eq!(network.port_count(), 0);
        assert!(mediator.notifications().is_empty());
    }
}
