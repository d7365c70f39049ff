//! Buses: broadcast-style shared state attached to ports

use crate::{BusId, PortId, PropertyBag, Value};

/// Shared state visible to every port it is attached to
///
/// Unlike signals, a bus has no driver and its value is written directly
/// rather than through the delta scheduler.
#[derive(Debug, Clone)]
pub struct Bus {
    id: BusId,
    label: String,
    value: Option<Value>,
    hold: bool,
    properties: PropertyBag,
    attached: Vec<(PortId, usize)>,
}

impl Bus {
    pub(crate) fn new(id: BusId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            value: None,
            hold: false,
            properties: PropertyBag::new(),
            attached: Vec::new(),
        }
    }

    pub fn id(&self) -> BusId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Write the shared value
    pub fn set_value(&mut self, value: Option<Value>) {
        self.value = value;
    }

    pub fn hold(&self) -> bool {
        self.hold
    }

    pub fn set_hold(&mut self, hold: bool) {
        self.hold = hold;
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    /// Ports (and their bus slots) this bus is attached to
    pub fn attached_ports(&self) -> &[(PortId, usize)] {
        &self.attached
    }

    pub fn is_attached(&self) -> bool {
        !self.attached.is_empty()
    }

    pub(crate) fn attach(&mut self, port: PortId, index: usize) {
        self.attached.push((port, index));
    }

    pub(crate) fn detach(&mut self, port: PortId, index: usize) {
        if let Some(pos) = self.attached.iter().position(|&e| e == (port, index)) {
            self.attached.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_attachment() {
        let mut bus = Bus::new(BusId::new(0), "clock");
        assert!(!bus.is_attached());
        bus.attach(PortId::new(1), 0);
        bus.attach(PortId::new(2), 1);
        assert_eq!(bus.attached_ports().len(), 2);
        bus.detach(PortId::new(1), 0);
        assert_eq!(bus.attached_ports(), &[(PortId::new(2), 1)]);
    }

    #[test]
    fn test_bus_value_written_directly() {
        let mut bus = Bus::new(BusId::new(0), "data");
        bus.set_value(Some(Value::Integer(5)));
        assert_eq!(bus.value(), Some(&Value::Integer(5)));
        bus.set_value(None);
        assert!(bus.value().is_none());
    }
}
