//! Entity definitions: the slot layout of a class of computation units

use crate::{Error, Identifier, Network, PortBindings, PortId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three slot families of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Input,
    Output,
    Bus,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Input => write!(f, "input"),
            SlotKind::Output => write!(f, "output"),
            SlotKind::Bus => write!(f, "bus"),
        }
    }
}

/// Immutable interface definition of a computation unit
///
/// A generic entity has a variable number of inputs and buses and must be
/// compiled to a concrete entity before ports can be instantiated from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: Identifier,
    symbol: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    buses: Vec<String>,
    generic: bool,
}

impl Entity {
    /// Create a concrete entity with no slots
    pub fn new(id: Identifier, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            buses: Vec::new(),
            generic: false,
        }
    }

    /// Create a generic entity whose input and bus arity is decided at compile time
    pub fn generic(id: Identifier, symbol: impl Into<String>) -> Self {
        Self {
            generic: true,
            ..Self::new(id, symbol)
        }
    }

    /// Set the input slot names
    pub fn with_inputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the output slot names
    pub fn with_outputs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the bus slot names
    pub fn with_buses<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buses = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn is_generic(&self) -> bool {
        self.generic
    }

    pub fn input_names(&self) -> &[String] {
        &self.inputs
    }

    pub fn output_names(&self) -> &[String] {
        &self.outputs
    }

    pub fn bus_names(&self) -> &[String] {
        &self.buses
    }

    /// Number of slots of the given kind
    pub fn slot_count(&self, kind: SlotKind) -> usize {
        match kind {
            SlotKind::Input => self.inputs.len(),
            SlotKind::Output => self.outputs.len(),
            SlotKind::Bus => self.buses.len(),
        }
    }

    /// Resolve a generic entity into a concrete one with the given arity
    ///
    /// Concrete entities are returned unchanged. Outputs of a generic entity
    /// are fixed by its definition; a generic entity without outputs cannot
    /// be compiled.
    pub fn compile_generic_entity(&self, input_count: usize, bus_count: usize) -> Result<Entity> {
        if !self.generic {
            return Ok(self.clone());
        }
        if self.outputs.is_empty() {
            return Err(Error::GenericEntityNotInstantiable(self.id.clone()));
        }
        let compiled = Entity {
            id: self.id.clone(),
            symbol: self.symbol.clone(),
            inputs: (0..input_count).map(|i| format!("in{}", i)).collect(),
            outputs: self.outputs.clone(),
            buses: (0..bus_count).map(|i| format!("bus{}", i)).collect(),
            generic: false,
        };
        Ok(compiled)
    }

    /// Instantiate a port from this entity inside `network`
    ///
    /// See [`Network::instantiate_port`].
    pub fn instantiate_port(&self, network: &mut Network, bindings: PortBindings) -> Result<PortId> {
        network.instantiate_port(self, bindings)
    }

    /// Resolve to the concrete entity a port would be built from
    pub(crate) fn resolve_for(&self, bindings: &PortBindings) -> Result<Entity> {
        if !self.generic {
            return Ok(self.clone());
        }
        let inputs = bindings
            .inputs
            .as_ref()
            .ok_or_else(|| Error::GenericEntityNotInstantiable(self.id.clone()))?;
        let bus_count = bindings.buses.as_ref().map(Vec::len).unwrap_or(0);
        self.compile_generic_entity(inputs.len(), bus_count)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) [{} in, {} out, {} bus]",
            self.id,
            self.symbol,
            self.inputs.len(),
            self.outputs.len(),
            self.buses.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_entity_slots() {
        let entity = Entity::new(Identifier::new("Add", "Std"), "+")
            .with_inputs(["a", "b"])
            .with_outputs(["sum"]);
        assert!(!entity.is_generic());
        assert_eq!(entity.slot_count(SlotKind::Input), 2);
        assert_eq!(entity.slot_count(SlotKind::Output), 1);
        assert_eq!(entity.slot_count(SlotKind::Bus), 0);
        assert_eq!(entity.compile_generic_entity(5, 5).unwrap(), entity);
    }

    #[test]
    fn test_compile_generic_entity() {
        let entity = Entity::generic(Identifier::new("Add", "Std"), "+").with_outputs(["sum"]);
        let compiled = entity.compile_generic_entity(3, 1).unwrap();
        assert!(!compiled.is_generic());
        assert_eq!(compiled.input_names(), &["in0", "in1", "in2"]);
        assert_eq!(compiled.output_names(), &["sum"]);
        assert_eq!(compiled.bus_names(), &["bus0"]);
        assert_eq!(compiled.id(), entity.id());
    }

    #[test]
    fn test_generic_requires_inputs() {
        let entity = Entity::generic(Identifier::new("Add", "Std"), "+").with_outputs(["sum"]);
        let err = entity.resolve_for(&PortBindings::new()).unwrap_err();
        assert!(matches!(err, Error::GenericEntityNotInstantiable(_)));

        let resolved = entity
            .resolve_for(&PortBindings::new().with_inputs(Vec::new()))
            .unwrap();
        assert_eq!(resolved.slot_count(SlotKind::Input), 0);
    }

    #[test]
    fn test_generic_without_outputs_is_rejected() {
        let sink = Entity::generic(Identifier::new("Sink", "Test"), "_");
        assert!(matches!(
            sink.compile_generic_entity(2, 0),
            Err(Error::GenericEntityNotInstantiable(_))
        ));
        assert!(matches!(
            sink.resolve_for(&PortBindings::new().with_inputs(Vec::new())),
            Err(Error::GenericEntityNotInstantiable(_))
        ));
    }
}
