//! Port instantiation and slot binding
//!
//! Every public operation completes its bookkeeping (slot write, cycle
//! counts, completeness, architecture relink) before queued notifications
//! are dispatched to the mediator.

use crate::{
    cycles::CycleUpdate, BusId, Entity, Error, Network, Notification, Port, PortBindings, PortId,
    Result, SignalId, SlotKind,
};

impl Network {
    /// Create a port from `entity` and apply the initial bindings
    ///
    /// Generic entities are compiled with the supplied input and bus counts.
    /// When no outputs are supplied, one fresh signal per output slot is
    /// created and driven by the new port. An architecture link is attempted
    /// once all bindings are in place.
    pub fn instantiate_port(&mut self, entity: &Entity, bindings: PortBindings) -> Result<PortId> {
        let concrete = entity.resolve_for(&bindings)?;
        check_arity(&concrete, SlotKind::Input, bindings.inputs.as_ref().map(Vec::len))?;
        check_arity(&concrete, SlotKind::Output, bindings.outputs.as_ref().map(Vec::len))?;
        check_arity(&concrete, SlotKind::Bus, bindings.buses.as_ref().map(Vec::len))?;

        let supplied_signals = bindings
            .inputs
            .iter()
            .chain(bindings.outputs.iter())
            .flatten()
            .flatten();
        for &signal in supplied_signals {
            self.signal(signal)?;
        }
        for &bus in bindings.buses.iter().flatten().flatten() {
            self.bus(bus)?;
        }

        let id = self.allocate_port_id();
        let output_names = concrete.output_names().to_vec();
        log::debug!("instantiating {} as {}", concrete.id(), id);
        self.queue_notification(Notification::NewPort {
            port: id,
            entity: concrete.id().clone(),
        });
        self.ports.insert(id, Port::new(id, concrete));

        let result = self.apply_initial_bindings(id, bindings, &output_names);
        self.commit(result.map(|_| id))
    }

    fn apply_initial_bindings(
        &mut self,
        port: PortId,
        bindings: PortBindings,
        output_names: &[String],
    ) -> Result<()> {
        let outputs = match bindings.outputs {
            Some(outputs) => outputs,
            None => output_names
                .iter()
                .map(|name| Some(self.allocate_signal(name.clone())))
                .collect(),
        };
        for (index, signal) in outputs.into_iter().enumerate() {
            if let Some(signal) = signal {
                self.write_output(port, index, Some(signal))?;
            }
        }
        for (index, signal) in bindings.inputs.into_iter().flatten().enumerate() {
            if let Some(signal) = signal {
                self.write_input(port, index, Some(signal))?;
            }
        }
        for (index, bus) in bindings.buses.into_iter().flatten().enumerate() {
            if let Some(bus) = bus {
                self.write_bus(port, index, Some(bus))?;
            }
        }
        self.refresh_port(port)?;
        Ok(())
    }

    /// Create a port of the same entity with other inputs and fresh outputs
    ///
    /// Buses are shared with the original port.
    pub fn clone_port_with_new_inputs(
        &mut self,
        port: PortId,
        inputs: impl IntoIterator<Item = SignalId>,
    ) -> Result<PortId> {
        let original = self.port(port)?;
        let entity = original.entity().clone();
        let buses = original.buses().to_vec();
        let bindings = PortBindings::new()
            .with_inputs(inputs)
            .with_partial_buses(buses);
        self.instantiate_port(&entity, bindings)
    }

    /// Unbind every slot, drop the architecture and remove the port
    pub fn remove_port(&mut self, port: PortId) -> Result<()> {
        let result = self.teardown_port(port);
        self.commit(result)
    }

    fn teardown_port(&mut self, port: PortId) -> Result<()> {
        self.unlink_architecture(port)?;
        let (inputs, outputs, buses) = {
            let p = self.port(port)?;
            (p.inputs().len(), p.outputs().len(), p.buses().len())
        };
        for index in 0..inputs {
            self.write_input(port, index, None)?;
        }
        for index in 0..outputs {
            self.write_output(port, index, None)?;
        }
        for index in 0..buses {
            self.write_bus(port, index, None)?;
        }
        self.ports.shift_remove(&port);
        log::debug!("removed {}", port);
        self.queue_notification(Notification::PortRemoved(port));
        Ok(())
    }

    // ---------------------------------------------------------------
    // Inputs
    // ---------------------------------------------------------------

    /// Bind `signal` to an empty input slot
    pub fn add_input_signal_binding(
        &mut self,
        port: PortId,
        index: usize,
        signal: SignalId,
    ) -> Result<()> {
        let result = self
            .require_empty(port, SlotKind::Input, index)
            .and_then(|_| self.write_input(port, index, Some(signal)))
            .and_then(|_| self.refresh_port(port));
        self.commit(result.map(|_| ()))
    }

    /// Clear an input slot, returning the signal it held
    pub fn remove_input_signal_binding(
        &mut self,
        port: PortId,
        index: usize,
    ) -> Result<Option<SignalId>> {
        let result = self.write_input(port, index, None).and_then(|previous| {
            self.refresh_port(port)?;
            Ok(previous)
        });
        self.commit(result)
    }

    /// Bind `signal` to an input slot, returning the signal it replaced
    pub fn replace_input_signal_binding(
        &mut self,
        port: PortId,
        index: usize,
        signal: SignalId,
    ) -> Result<Option<SignalId>> {
        let result = self.write_input(port, index, Some(signal)).and_then(|previous| {
            self.refresh_port(port)?;
            Ok(previous)
        });
        self.commit(result)
    }

    // ---------------------------------------------------------------
    // Outputs
    // ---------------------------------------------------------------

    /// Bind `signal` to an empty output slot; the port becomes its driver
    ///
    /// A previous driver of `signal` loses its slot first.
    pub fn add_output_signal_binding(
        &mut self,
        port: PortId,
        index: usize,
        signal: SignalId,
    ) -> Result<()> {
        let result = self
            .require_empty(port, SlotKind::Output, index)
            .and_then(|_| self.write_output(port, index, Some(signal)))
            .and_then(|_| self.refresh_port(port));
        self.commit(result.map(|_| ()))
    }

    /// Clear an output slot; the signal it held becomes undriven
    pub fn remove_output_signal_binding(
        &mut self,
        port: PortId,
        index: usize,
    ) -> Result<Option<SignalId>> {
        let result = self.write_output(port, index, None).and_then(|previous| {
            self.refresh_port(port)?;
            Ok(previous)
        });
        self.commit(result)
    }

    pub fn replace_output_signal_binding(
        &mut self,
        port: PortId,
        index: usize,
        signal: SignalId,
    ) -> Result<Option<SignalId>> {
        let result = self.write_output(port, index, Some(signal)).and_then(|previous| {
            self.refresh_port(port)?;
            Ok(previous)
        });
        self.commit(result)
    }

    // ---------------------------------------------------------------
    // Buses
    // ---------------------------------------------------------------

    pub fn add_bus_binding(&mut self, port: PortId, index: usize, bus: BusId) -> Result<()> {
        let result = self
            .require_empty(port, SlotKind::Bus, index)
            .and_then(|_| self.write_bus(port, index, Some(bus)))
            .and_then(|_| self.refresh_port(port));
        self.commit(result.map(|_| ()))
    }

    pub fn remove_bus_binding(&mut self, port: PortId, index: usize) -> Result<Option<BusId>> {
        let result = self.write_bus(port, index, None).and_then(|previous| {
            self.refresh_port(port)?;
            Ok(previous)
        });
        self.commit(result)
    }

    pub fn replace_bus_binding(
        &mut self,
        port: PortId,
        index: usize,
        bus: BusId,
    ) -> Result<Option<BusId>> {
        let result = self.write_bus(port, index, Some(bus)).and_then(|previous| {
            self.refresh_port(port)?;
            Ok(previous)
        });
        self.commit(result)
    }

    // ---------------------------------------------------------------
    // Slot writes
    // ---------------------------------------------------------------

    fn write_input(
        &mut self,
        port: PortId,
        index: usize,
        signal: Option<SignalId>,
    ) -> Result<Option<SignalId>> {
        self.check_index(port, SlotKind::Input, index)?;
        if let Some(signal) = signal {
            self.signal(signal)?;
        }
        let previous = self.port(port)?.input(index);
        if previous == signal {
            return Ok(previous);
        }

        if let Some(old) = previous {
            self.update_cycles_for_input(port, old, CycleUpdate::Remove);
            self.port_mut(port)?.set_input(index, None);
            if let Some(s) = self.signals.get_mut(&old) {
                s.detach_fan_out(port, index);
            }
            log::debug!("{} no longer feeds {} input {}", old, port, index);
            self.queue_notification(Notification::SignalNoLongerDrivesPort {
                signal: old,
                port,
                input: index,
            });
        }

        if let Some(new) = signal {
            self.port_mut(port)?.set_input(index, Some(new));
            self.signal_entry(new)?.attach_fan_out(port, index);
            self.update_cycles_for_input(port, new, CycleUpdate::Add);
            log::debug!("{} feeds {} input {}", new, port, index);
            self.queue_notification(Notification::SignalDrivesPort {
                signal: new,
                port,
                input: index,
            });
        }
        Ok(previous)
    }

    fn write_output(
        &mut self,
        port: PortId,
        index: usize,
        signal: Option<SignalId>,
    ) -> Result<Option<SignalId>> {
        self.check_index(port, SlotKind::Output, index)?;
        if let Some(signal) = signal {
            self.signal(signal)?;
        }
        let previous = self.port(port)?.output(index);
        if previous == signal {
            return Ok(previous);
        }

        if let Some(old) = previous {
            self.update_cycles_for_output(port, old, CycleUpdate::Remove);
            self.port_mut(port)?.set_output(index, None);
            if let Some(s) = self.signals.get_mut(&old) {
                s.undrive();
            }
            log::debug!("{} no longer drives {}", port, old);
            self.queue_notification(Notification::PortNoLongerDrivesSignal {
                port,
                signal: old,
                output: index,
            });
        }

        if let Some(new) = signal {
            if let Some((driver, slot)) = self.signal(new)?.driven_by() {
                self.write_output(driver, slot, None)?;
                if driver != port {
                    self.refresh_port(driver)?;
                }
            }
            self.port_mut(port)?.set_output(index, Some(new));
            self.signal_entry(new)?.drive(port, index);
            self.update_cycles_for_output(port, new, CycleUpdate::Add);
            log::debug!("{} drives {}", port, new);
            self.queue_notification(Notification::PortDrivesSignal {
                port,
                signal: new,
                output: index,
            });
        }
        Ok(previous)
    }

    fn write_bus(&mut self, port: PortId, index: usize, bus: Option<BusId>) -> Result<Option<BusId>> {
        self.check_index(port, SlotKind::Bus, index)?;
        if let Some(bus) = bus {
            self.bus(bus)?;
        }
        let previous = self.port(port)?.bus(index);
        if previous == bus {
            return Ok(previous);
        }

        if let Some(old) = previous {
            self.port_mut(port)?.set_bus(index, None);
            if let Some(b) = self.buses.get_mut(&old) {
                b.detach(port, index);
            }
            self.queue_notification(Notification::BusDetachedFromPort {
                bus: old,
                port,
                index,
            });
        }

        if let Some(new) = bus {
            self.port_mut(port)?.set_bus(index, Some(new));
            self.bus_mut(new)?.attach(port, index);
            log::debug!("{} attached to {} slot {}", new, port, index);
            self.queue_notification(Notification::BusAttachedToPort {
                bus: new,
                port,
                index,
            });
        }
        Ok(previous)
    }

    /// Recompute completeness and keep, replace or drop the architecture
    ///
    /// Returns whether an architecture is linked afterwards.
    pub(crate) fn refresh_port(&mut self, port: PortId) -> Result<bool> {
        if !self.port_mut(port)?.recompute_completeness() {
            self.unlink_architecture(port)?;
            return Ok(false);
        }
        let lookup = self.config.auto_link_architectures();
        self.relink_architecture(port, lookup)
    }

    fn commit<T>(&mut self, result: Result<T>) -> Result<T> {
        self.flush_notifications();
        result
    }

    fn signal_entry(&mut self, id: SignalId) -> Result<&mut crate::Signal> {
        self.signals.get_mut(&id).ok_or(Error::SignalNotFound(id))
    }

    fn check_index(&self, port: PortId, kind: SlotKind, index: usize) -> Result<()> {
        let count = self.port(port)?.slot_count(kind);
        if index >= count {
            return Err(Error::invalid(format!(
                "{} has {} {} slots, index {} is out of range",
                port, count, kind, index
            )));
        }
        Ok(())
    }

    fn require_empty(&self, port: PortId, kind: SlotKind, index: usize) -> Result<()> {
        self.check_index(port, kind, index)?;
        let p = self.port(port)?;
        let occupied = match kind {
            SlotKind::Input => p.input(index).is_some(),
            SlotKind::Output => p.output(index).is_some(),
            SlotKind::Bus => p.bus(index).is_some(),
        };
        if occupied {
            return Err(Error::invalid(format!(
                "{} slot {} of {} is already bound",
                kind, index, port
            )));
        }
        Ok(())
    }
}

fn check_arity(entity: &Entity, kind: SlotKind, supplied: Option<usize>) -> Result<()> {
    match supplied {
        Some(got) if got != entity.slot_count(kind) => Err(Error::EntitySignalMismatch {
            entity: entity.id().clone(),
            kind,
            expected: entity.slot_count(kind),
            got,
        }),
        _ => Ok(()),
    }
}
