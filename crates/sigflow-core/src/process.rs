//! Reactive processes
//!
//! A process is a long-lived subscriber: it senses a set of signals and its
//! [`Process::action`] runs once per delta step for every sensed signal whose
//! value changed. Processes are owned by the network and addressed by
//! [`ProcessId`]; while an action runs the process is taken out of its slot,
//! so it may freely mutate the network through its [`ProcessContext`].

use crate::{BusId, Error, Network, Port, ProcessId, Result, Signal, SignalId, Value, Writer};
use std::fmt;
use std::time::Duration;

/// Signals handed to a process at registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSignals {
    pub inputs: Vec<SignalId>,
    pub outputs: Vec<SignalId>,
    pub internal: Vec<SignalId>,
    pub buses: Vec<BusId>,
}

impl ProcessSignals {
    /// The bound inputs, outputs and buses of `port`
    pub fn for_port(port: &Port) -> Self {
        Self {
            inputs: port.input_signals().collect(),
            outputs: port.output_signals().collect(),
            internal: Vec::new(),
            buses: port.bus_list().collect(),
        }
    }
}

/// A reactive handler re-executed when a sensed signal changes
pub trait Process: fmt::Debug {
    /// Set up sensitivity; called once when the process is registered
    fn register(&mut self, ctx: &mut ProcessContext<'_>, signals: &ProcessSignals) -> Result<()>;

    /// React to a change of `origin`, or to a forced update (`is_init`)
    fn action(
        &mut self,
        ctx: &mut ProcessContext<'_>,
        is_init: bool,
        origin: Option<SignalId>,
    ) -> Result<()>;
}

/// Network access for a running process
pub struct ProcessContext<'a> {
    network: &'a mut Network,
    process: ProcessId,
}

impl<'a> ProcessContext<'a> {
    pub fn process_id(&self) -> ProcessId {
        self.process
    }

    pub fn network(&self) -> &Network {
        &*self.network
    }

    /// Wake this process whenever `signal` changes
    pub fn sense_signal(&mut self, signal: SignalId) -> Result<()> {
        self.network.sense_signal(self.process, signal)
    }

    pub fn stop_sense_signal(&mut self, signal: SignalId) -> Result<()> {
        self.network.stop_sense_signal(self.process, signal)
    }

    pub fn signal(&self, signal: SignalId) -> Result<&Signal> {
        self.network.signal(signal)
    }

    pub fn value(&self, signal: SignalId) -> Result<Option<&Value>> {
        self.network.value(signal)
    }

    pub fn bus_value(&self, bus: BusId) -> Result<Option<&Value>> {
        Ok(self.network.bus(bus)?.value())
    }

    /// Schedule `value` for the next delta step
    pub fn post_new_value(&mut self, signal: SignalId, value: impl Into<Value>) -> Result<()> {
        self.network
            .schedule_delta(Writer::Process(self.process), signal, value.into())
    }

    pub fn post_new_value_delayed(
        &mut self,
        signal: SignalId,
        value: impl Into<Value>,
        delay: Duration,
    ) -> Result<()> {
        self.network.post_new_value_delayed(signal, value, delay)
    }
}

pub(crate) struct ProcessSlot {
    process: Option<Box<dyn Process>>,
    sensitivity: Vec<SignalId>,
    paused: bool,
}

impl ProcessSlot {
    pub(crate) fn forget_signal(&mut self, signal: SignalId) {
        self.sensitivity.retain(|&s| s != signal);
    }
}

impl Network {
    /// Register a process and let it set up its sensitivity
    pub fn register_process(
        &mut self,
        mut process: Box<dyn Process>,
        signals: &ProcessSignals,
    ) -> Result<ProcessId> {
        let id = self.allocate_process_id();
        self.processes.insert(
            id,
            ProcessSlot {
                process: None,
                sensitivity: Vec::new(),
                paused: false,
            },
        );

        let result = {
            let mut ctx = ProcessContext {
                network: self,
                process: id,
            };
            process.register(&mut ctx, signals)
        };
        if let Err(err) = result {
            self.unregister_process(id)?;
            return Err(err);
        }

        if let Some(slot) = self.processes.get_mut(&id) {
            slot.process = Some(process);
        }
        log::trace!("registered {}", id);
        Ok(id)
    }

    /// Remove a process and all of its subscriptions
    pub fn unregister_process(&mut self, id: ProcessId) -> Result<()> {
        let slot = self
            .processes
            .shift_remove(&id)
            .ok_or(Error::ProcessNotFound(id))?;
        for signal in slot.sensitivity {
            if let Some(s) = self.signals.get_mut(&signal) {
                s.unsubscribe(id);
            }
        }
        log::trace!("unregistered {}", id);
        Ok(())
    }

    pub fn sense_signal(&mut self, process: ProcessId, signal: SignalId) -> Result<()> {
        self.signal(signal)?;
        let slot = self.slot_mut(process)?;
        if slot.sensitivity.contains(&signal) {
            return Ok(());
        }
        slot.sensitivity.push(signal);
        let subscribe = !slot.paused;
        if subscribe {
            if let Some(s) = self.signals.get_mut(&signal) {
                s.subscribe(process);
            }
        }
        Ok(())
    }

    pub fn stop_sense_signal(&mut self, process: ProcessId, signal: SignalId) -> Result<()> {
        self.slot_mut(process)?.forget_signal(signal);
        if let Some(s) = self.signals.get_mut(&signal) {
            s.unsubscribe(process);
        }
        Ok(())
    }

    /// Stop waking the process without forgetting its sensitivity
    pub fn pause_process(&mut self, process: ProcessId) -> Result<()> {
        let slot = self.slot_mut(process)?;
        if slot.paused {
            return Ok(());
        }
        slot.paused = true;
        let sensed = slot.sensitivity.clone();
        for signal in sensed {
            if let Some(s) = self.signals.get_mut(&signal) {
                s.unsubscribe(process);
            }
        }
        Ok(())
    }

    /// Resubscribe a paused process to its sensitivity list
    pub fn continue_process(&mut self, process: ProcessId) -> Result<()> {
        let slot = self.slot_mut(process)?;
        if !slot.paused {
            return Ok(());
        }
        slot.paused = false;
        let sensed = slot.sensitivity.clone();
        for signal in sensed {
            if let Some(s) = self.signals.get_mut(&signal) {
                s.subscribe(process);
            }
        }
        Ok(())
    }

    pub fn is_paused(&self, process: ProcessId) -> Result<bool> {
        Ok(self.slot(process)?.paused)
    }

    /// Signals the process is sensitive to, in registration order
    pub fn sensitivity(&self, process: ProcessId) -> Result<&[SignalId]> {
        Ok(&self.slot(process)?.sensitivity)
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    /// Run the action with `is_init` set, whether or not the process is paused
    pub fn force_update(&mut self, process: ProcessId) -> Result<()> {
        self.invoke_process(process, true, None)
    }

    pub(crate) fn invoke_process(
        &mut self,
        id: ProcessId,
        is_init: bool,
        origin: Option<SignalId>,
    ) -> Result<()> {
        let Some(mut process) = self.slot_mut(id)?.process.take() else {
            log::warn!("{} is already running, skipping re-entrant call", id);
            return Ok(());
        };
        let result = {
            let mut ctx = ProcessContext {
                network: self,
                process: id,
            };
            process.action(&mut ctx, is_init, origin)
        };
        // the action may have unregistered its own process
        if let Some(slot) = self.processes.get_mut(&id) {
            slot.process = Some(process);
        }
        result
    }

    fn slot(&self, id: ProcessId) -> Result<&ProcessSlot> {
        self.processes.get(&id).ok_or(Error::ProcessNotFound(id))
    }

    fn slot_mut(&mut self, id: ProcessId) -> Result<&mut ProcessSlot> {
        self.processes.get_mut(&id).ok_or(Error::ProcessNotFound(id))
    }
}
