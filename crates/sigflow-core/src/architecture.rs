//! Architectures: concrete implementations of an entity
//!
//! An architecture starts as a template registered in a [`Library`](crate::Library).
//! When a port becomes completely connected, the network instantiates a
//! supporting template to that port and registers it. Registration usually
//! means registering one or more processes sensitive to the port's inputs.
//!
//! ```text
//! Template (unbound) --instantiate_to_port--> Instance (bound to one port)
//!                                                 |
//!                        rebind_to_port_if_supported (same entity)
//! ```

use crate::{Error, Identifier, Network, Port, PortId, ProcessId, Result};
use std::fmt;

/// State shared by every architecture implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureState {
    id: Identifier,
    entity_id: Identifier,
    bound_port: Option<PortId>,
    processes: Vec<ProcessId>,
}

impl ArchitectureState {
    /// State of an unbound template
    pub fn template(id: Identifier, entity_id: Identifier) -> Self {
        Self {
            id,
            entity_id,
            bound_port: None,
            processes: Vec::new(),
        }
    }

    /// State of a fresh instance bound to `port`
    pub fn instance(&self, port: PortId) -> Self {
        Self {
            id: self.id.clone(),
            entity_id: self.entity_id.clone(),
            bound_port: Some(port),
            processes: Vec::new(),
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn entity_id(&self) -> &Identifier {
        &self.entity_id
    }

    pub fn bound_port(&self) -> Option<PortId> {
        self.bound_port
    }

    /// Processes registered on behalf of this architecture
    pub fn processes(&self) -> &[ProcessId] {
        &self.processes
    }

    pub fn add_process(&mut self, process: ProcessId) {
        self.processes.push(process);
    }

    pub fn take_processes(&mut self) -> Vec<ProcessId> {
        std::mem::take(&mut self.processes)
    }

    /// The bound port, or an error for templates
    pub fn require_port(&self) -> Result<PortId> {
        self.bound_port.ok_or_else(|| {
            Error::invalid(format!("architecture {} is not bound to a port", self.id))
        })
    }

    pub(crate) fn rebind(&mut self, port: PortId) {
        self.bound_port = Some(port);
    }
}

/// A concrete implementation of an entity, bound to at most one port
pub trait Architecture: fmt::Debug {
    fn state(&self) -> &ArchitectureState;

    fn state_mut(&mut self) -> &mut ArchitectureState;

    /// Create an instance of this template bound to `port`
    ///
    /// The instance is not registered yet; the network calls
    /// [`register_architecture`](Architecture::register_architecture) next.
    fn instantiate_to_port(&self, port: &Port) -> Box<dyn Architecture>;

    /// Wire the instance to its bound port (processes, subscriptions)
    fn register_architecture(&mut self, network: &mut Network) -> Result<()>;

    /// Release everything `register_architecture` set up
    fn unregister_architecture(&mut self, network: &mut Network) -> Result<()> {
        for process in self.state_mut().take_processes() {
            if network.unregister_process(process).is_err() {
                log::warn!("{} of {} was already unregistered", process, self.id());
            }
        }
        Ok(())
    }

    fn id(&self) -> &Identifier {
        self.state().id()
    }

    fn entity_id(&self) -> &Identifier {
        self.state().entity_id()
    }

    fn bound_port(&self) -> Option<PortId> {
        self.state().bound_port()
    }

    fn is_instance(&self) -> bool {
        self.bound_port().is_some()
    }

    /// Whether the architecture computes a pure function of its inputs
    fn is_mathematical_operator(&self) -> bool {
        false
    }

    /// Check if this architecture can serve `port`
    fn supports_port(&self, port: &Port) -> bool {
        port.entity().id() == self.entity_id()
    }

    /// Evaluate the operator once, posting results to the output signals
    ///
    /// The default forces an update of every registered process.
    fn execute_mathematical_operator(&mut self, network: &mut Network) -> Result<()> {
        if !self.is_mathematical_operator() {
            return Err(Error::unsupported(format!(
                "architecture {} is not a mathematical operator",
                self.id()
            )));
        }
        for process in self.state().processes().to_vec() {
            network.force_update(process)?;
        }
        Ok(())
    }

    /// Move this instance to another port without reinstantiating it
    ///
    /// Succeeds trivially if `port` is already the bound port. Returns
    /// `Ok(false)` without side effects if the port is not supported.
    fn rebind_to_port_if_supported(&mut self, network: &mut Network, port: PortId) -> Result<bool> {
        if self.bound_port() == Some(port) {
            return Ok(true);
        }
        if !self.supports_port(network.port(port)?) {
            return Ok(false);
        }
        self.unregister_architecture(network)?;
        self.state_mut().rebind(port);
        self.register_architecture(network)?;
        Ok(true)
    }
}
