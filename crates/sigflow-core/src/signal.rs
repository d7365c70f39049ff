//! Signals: single-value dataflow nodes

use crate::{PortId, ProcessId, PropertyBag, PropertyTrigger, SignalId, Value};

/// A single-value node with at most one driving port and many dependents
///
/// Structural state (drive source, fan-out, cycle count, subscribers) is
/// maintained by the [`Network`](crate::Network); the public mutators here only
/// touch descriptive state.
#[derive(Debug, Clone)]
pub struct Signal {
    id: SignalId,
    label: String,
    value: Option<Value>,
    driven_by: Option<(PortId, usize)>,
    source: bool,
    hold: bool,
    cycle_count: usize,
    properties: PropertyBag,
    constraints: PropertyBag,
    fan_out: Vec<(PortId, usize)>,
    subscribers: Vec<ProcessId>,
}

impl Signal {
    pub(crate) fn new(id: SignalId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            value: None,
            driven_by: None,
            source: true,
            hold: false,
            cycle_count: 0,
            properties: PropertyBag::new(),
            constraints: PropertyBag::new(),
            fan_out: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn id(&self) -> SignalId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// The current value, if one has been applied
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// The driving port and its output slot
    pub fn driven_by(&self) -> Option<(PortId, usize)> {
        self.driven_by
    }

    pub fn driven_by_port(&self) -> Option<PortId> {
        self.driven_by.map(|(port, _)| port)
    }

    pub fn is_driven(&self) -> bool {
        self.driven_by.is_some()
    }

    /// Whether the signal is treated as an independent input
    ///
    /// Always true while undriven. Dependency and cycle analysis stop at
    /// source signals.
    pub fn is_source_signal(&self) -> bool {
        self.source || self.driven_by.is_none()
    }

    /// Mark a driven signal as independent input; ignored while undriven
    ///
    /// Cycle counts depend on this flag, so callers go through
    /// [`Network::set_source_signal`](crate::Network::set_source_signal).
    pub(crate) fn set_source_signal(&mut self, source: bool) {
        self.source = source || self.driven_by.is_none();
    }

    pub fn hold(&self) -> bool {
        self.hold
    }

    pub fn set_hold(&mut self, hold: bool) {
        self.hold = hold;
    }

    /// Number of feedback paths through this signal
    pub fn cycles(&self) -> usize {
        self.cycle_count
    }

    pub fn is_cyclic(&self) -> bool {
        self.cycle_count > 0
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    pub fn constraints(&self) -> &PropertyBag {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut PropertyBag {
        &mut self.constraints
    }

    /// Ports (and their input slots) this signal feeds
    pub fn fan_out(&self) -> &[(PortId, usize)] {
        &self.fan_out
    }

    /// Processes currently woken by value changes of this signal
    pub fn subscribers(&self) -> &[ProcessId] {
        &self.subscribers
    }

    pub(crate) fn drive(&mut self, port: PortId, output: usize) {
        self.driven_by = Some((port, output));
        self.source = false;
        self.properties.validate(PropertyTrigger::Driven);
    }

    pub(crate) fn undrive(&mut self) {
        self.driven_by = None;
        self.source = true;
        self.properties.validate(PropertyTrigger::Undriven);
    }

    /// Store a new value; returns true if it differs from the previous one
    pub(crate) fn apply_value(&mut self, value: Value) -> bool {
        let changed = self.value.as_ref() != Some(&value);
        self.value = Some(value);
        self.properties.validate(PropertyTrigger::ValueChanged);
        changed
    }

    pub(crate) fn initialize_value(&mut self, value: Option<Value>) {
        self.value = value;
    }

    pub(crate) fn add_cycles(&mut self, count: usize) {
        self.cycle_count += count;
    }

    pub(crate) fn remove_cycles(&mut self, count: usize) {
        debug_assert!(
            self.cycle_count >= count,
            "cycle count of {} would underflow ({} - {})",
            self.id,
            self.cycle_count,
            count
        );
        if self.cycle_count < count {
            log::error!(
                "cycle count of {} underflows ({} - {}), clamping to zero",
                self.id,
                self.cycle_count,
                count
            );
        }
        self.cycle_count = self.cycle_count.saturating_sub(count);
    }

    pub(crate) fn attach_fan_out(&mut self, port: PortId, input: usize) {
        self.fan_out.push((port, input));
    }

    pub(crate) fn detach_fan_out(&mut self, port: PortId, input: usize) {
        if let Some(pos) = self.fan_out.iter().position(|&e| e == (port, input)) {
            self.fan_out.remove(pos);
        }
    }

    pub(crate) fn subscribe(&mut self, process: ProcessId) {
        if !self.subscribers.contains(&process) {
            self.subscribers.push(process);
        }
    }

    pub(crate) fn unsubscribe(&mut self, process: ProcessId) {
        self.subscribers.retain(|&p| p != process);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Identifier, Property, Retention};

    #[test]
    fn test_new_signal_is_source() {
        let signal = Signal::new(SignalId::new(0), "a");
        assert!(!signal.is_driven());
        assert!(signal.is_source_signal());
        assert!(!signal.is_cyclic());
        assert!(signal.value().is_none());
    }

    #[test]
    fn test_source_flag_forced_while_undriven() {
        let mut signal = Signal::new(SignalId::new(0), "a");
        signal.set_source_signal(false);
        assert!(signal.is_source_signal());

        signal.drive(PortId::new(1), 0);
        assert!(!signal.is_source_signal());
        signal.set_source_signal(true);
        assert!(signal.is_source_signal());
        signal.set_source_signal(false);
        assert!(!signal.is_source_signal());

        signal.undrive();
        assert!(signal.is_source_signal());
    }

    #[test]
    fn test_drive_revalidates_properties() {
        let mut signal = Signal::new(SignalId::new(0), "a");
        let constant = Identifier::new("Constant", "Test");
        signal
            .properties_mut()
            .add(Property::new(constant.clone()).with_retention(Retention::STRUCTURAL));
        signal
            .constraints_mut()
            .add(Property::new(constant.clone()).with_retention(Retention::TRANSIENT));

        signal.apply_value(Value::Integer(1));
        assert!(signal.properties().contains(&constant));
        signal.drive(PortId::new(1), 0);
        assert!(!signal.properties().contains(&constant));
        // constraints are never revalidated
        assert!(signal.constraints().contains(&constant));
    }

    #[test]
    fn test_apply_value_reports_change() {
        let mut signal = Signal::new(SignalId::new(0), "a");
        assert!(signal.apply_value(Value::Integer(1)));
        assert!(!signal.apply_value(Value::Integer(1)));
        assert!(signal.apply_value(Value::Integer(2)));
        assert_eq!(signal.value(), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_cycle_counting() {
        let mut signal = Signal::new(SignalId::new(0), "a");
        signal.add_cycles(2);
        assert_eq!(signal.cycles(), 2);
        assert!(signal.is_cyclic());
        signal.remove_cycles(2);
        assert_eq!(signal.cycles(), 0);
    }
}
