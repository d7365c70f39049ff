//! Ports: the binding hub between signals, buses and an architecture

use crate::{Architecture, BusId, Entity, PortId, SignalId, SlotKind};
use std::fmt;

/// Marker of one cycle-analysis traversal
///
/// A port records the last tag it was visited with, so a traversal never
/// expands the same port twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraversalTag(u64);

/// Mints distinct traversal tags
#[derive(Debug, Default)]
pub(crate) struct TagCounter {
    next: u64,
}

impl TagCounter {
    pub(crate) fn next_tag(&mut self) -> TraversalTag {
        self.next += 1;
        TraversalTag(self.next)
    }
}

/// Optional initial bindings for [`Network::instantiate_port`](crate::Network::instantiate_port)
///
/// `None` for a family means "not supplied": inputs and buses stay empty and
/// fresh output signals are created. A supplied list must match the entity's
/// slot count; `None` entries leave the slot empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortBindings {
    pub inputs: Option<Vec<Option<SignalId>>>,
    pub outputs: Option<Vec<Option<SignalId>>>,
    pub buses: Option<Vec<Option<BusId>>>,
}

impl PortBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = SignalId>) -> Self {
        self.inputs = Some(inputs.into_iter().map(Some).collect());
        self
    }

    pub fn with_partial_inputs(mut self, inputs: Vec<Option<SignalId>>) -> Self {
        self.inputs = Some(inputs);
        self
    }

    pub fn with_outputs(mut self, outputs: impl IntoIterator<Item = SignalId>) -> Self {
        self.outputs = Some(outputs.into_iter().map(Some).collect());
        self
    }

    pub fn with_partial_outputs(mut self, outputs: Vec<Option<SignalId>>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    pub fn with_buses(mut self, buses: impl IntoIterator<Item = BusId>) -> Self {
        self.buses = Some(buses.into_iter().map(Some).collect());
        self
    }

    pub fn with_partial_buses(mut self, buses: Vec<Option<BusId>>) -> Self {
        self.buses = Some(buses);
        self
    }
}

/// An instance of an entity with input, output and bus slots
///
/// Slot arrays have the entity's declared lengths. The port owns the
/// architecture currently linked to it, if any.
#[derive(Debug)]
pub struct Port {
    id: PortId,
    entity: Entity,
    inputs: Vec<Option<SignalId>>,
    outputs: Vec<Option<SignalId>>,
    buses: Vec<Option<BusId>>,
    completely_connected: bool,
    pub(crate) architecture: Option<Box<dyn Architecture>>,
    last_tag: Option<TraversalTag>,
}

impl Port {
    pub(crate) fn new(id: PortId, entity: Entity) -> Self {
        let inputs = vec![None; entity.slot_count(SlotKind::Input)];
        let outputs = vec![None; entity.slot_count(SlotKind::Output)];
        let buses = vec![None; entity.slot_count(SlotKind::Bus)];
        let mut port = Self {
            id,
            entity,
            inputs,
            outputs,
            buses,
            completely_connected: false,
            architecture: None,
            last_tag: None,
        };
        port.recompute_completeness();
        port
    }

    pub fn id(&self) -> PortId {
        self.id
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn inputs(&self) -> &[Option<SignalId>] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Option<SignalId>] {
        &self.outputs
    }

    pub fn buses(&self) -> &[Option<BusId>] {
        &self.buses
    }

    pub fn input(&self, index: usize) -> Option<SignalId> {
        self.inputs.get(index).copied().flatten()
    }

    pub fn output(&self, index: usize) -> Option<SignalId> {
        self.outputs.get(index).copied().flatten()
    }

    pub fn bus(&self, index: usize) -> Option<BusId> {
        self.buses.get(index).copied().flatten()
    }

    /// Bound input signals in slot order
    pub fn input_signals(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.inputs.iter().flatten().copied()
    }

    /// Bound output signals in slot order
    pub fn output_signals(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.outputs.iter().flatten().copied()
    }

    /// Attached buses in slot order
    pub fn bus_list(&self) -> impl Iterator<Item = BusId> + '_ {
        self.buses.iter().flatten().copied()
    }

    pub fn slot_count(&self, kind: SlotKind) -> usize {
        match kind {
            SlotKind::Input => self.inputs.len(),
            SlotKind::Output => self.outputs.len(),
            SlotKind::Bus => self.buses.len(),
        }
    }

    /// True iff every input, output and bus slot is bound
    pub fn is_completely_connected(&self) -> bool {
        self.completely_connected
    }

    pub fn has_architecture_link(&self) -> bool {
        self.architecture.is_some()
    }

    pub fn architecture(&self) -> Option<&dyn Architecture> {
        self.architecture.as_deref()
    }

    pub(crate) fn set_input(&mut self, index: usize, signal: Option<SignalId>) {
        self.inputs[index] = signal;
    }

    pub(crate) fn set_output(&mut self, index: usize, signal: Option<SignalId>) {
        self.outputs[index] = signal;
    }

    pub(crate) fn set_bus(&mut self, index: usize, bus: Option<BusId>) {
        self.buses[index] = bus;
    }

    pub(crate) fn recompute_completeness(&mut self) -> bool {
        self.completely_connected = self.inputs.iter().all(Option::is_some)
            && self.outputs.iter().all(Option::is_some)
            && self.buses.iter().all(Option::is_some);
        self.completely_connected
    }

    /// Record a visit; false if already visited with `tag`
    pub(crate) fn mark_visited(&mut self, tag: TraversalTag) -> bool {
        if self.last_tag == Some(tag) {
            return false;
        }
        self.last_tag = Some(tag);
        true
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.id, self.entity.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Identifier;

    fn entity() -> Entity {
        Entity::new(Identifier::new("Mux", "Test"), "mux")
            .with_inputs(["a", "b"])
            .with_outputs(["y"])
            .with_buses(["sel"])
    }

    #[test]
    fn test_completeness_tracks_all_slot_families() {
        let mut port = Port::new(PortId::new(0), entity());
        assert!(!port.is_completely_connected());

        port.set_input(0, Some(SignalId::new(1)));
        port.set_input(1, Some(SignalId::new(2)));
        port.set_output(0, Some(SignalId::new(3)));
        assert!(!port.recompute_completeness());

        port.set_bus(0, Some(BusId::new(0)));
        assert!(port.recompute_completeness());

        port.set_input(1, None);
        assert!(!port.recompute_completeness());
        assert_eq!(port.input_signals().collect::<Vec<_>>(), vec![SignalId::new(1)]);
    }

    #[test]
    fn test_slotless_entity_is_complete() {
        let port = Port::new(PortId::new(0), Entity::new(Identifier::new("Nop", "Test"), "nop"));
        assert!(port.is_completely_connected());
    }

    #[test]
    fn test_mark_visited_once_per_tag() {
        let mut counter = TagCounter::default();
        let mut port = Port::new(PortId::new(0), entity());
        let first = counter.next_tag();
        let second = counter.next_tag();
        assert_ne!(first, second);
        assert!(port.mark_visited(first));
        assert!(!port.mark_visited(first));
        assert!(port.mark_visited(second));
    }
}
