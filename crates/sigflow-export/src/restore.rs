//! Rebuild a network from a snapshot

use crate::{Error, Result, Snapshot};
use indexmap::IndexMap;
use sigflow_core::{BusId, Network, PortBindings, PortId, SignalId};

/// Mapping from snapshot guids to the ids created on restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuidMap {
    pub signals: IndexMap<u64, SignalId>,
    pub buses: IndexMap<u64, BusId>,
    pub ports: IndexMap<u64, PortId>,
}

impl GuidMap {
    pub fn signal(&self, guid: u64) -> Result<SignalId> {
        self.signals
            .get(&guid)
            .copied()
            .ok_or(Error::UnknownGuid { kind: "signal", guid })
    }

    pub fn bus(&self, guid: u64) -> Result<BusId> {
        self.buses
            .get(&guid)
            .copied()
            .ok_or(Error::UnknownGuid { kind: "bus", guid })
    }

    pub fn port(&self, guid: u64) -> Result<PortId> {
        self.ports
            .get(&guid)
            .copied()
            .ok_or(Error::UnknownGuid { kind: "port", guid })
    }
}

impl Snapshot {
    /// Recreate every captured node inside `network`
    ///
    /// Signals and buses are created first, then ports are instantiated with
    /// their recorded bindings. Hold flags, source flags and property sets are
    /// applied last so drive changes during port instantiation cannot drop
    /// them; setting a source flag re-counts the loops it cuts.
    pub fn restore(&self, network: &mut Network) -> Result<GuidMap> {
        let mut map = GuidMap::default();

        for record in &self.signals {
            let id = match &record.value {
                Some(value) => network.create_signal_with_value(record.label.clone(), value.clone()),
                None => network.create_signal(record.label.clone()),
            };
            map.signals.insert(record.guid, id);
        }

        for record in &self.buses {
            let id = network.create_bus(record.label.clone());
            let bus = network.bus_mut(id)?;
            bus.set_hold(record.hold);
            bus.set_value(record.value.clone());
            for property in &record.properties {
                bus.properties_mut().add(property.clone());
            }
            map.buses.insert(record.guid, id);
        }

        for record in &self.ports {
            let inputs = record
                .inputs
                .iter()
                .map(|slot| slot.map(|guid| map.signal(guid)).transpose())
                .collect::<Result<Vec<_>>>()?;
            let outputs = record
                .outputs
                .iter()
                .map(|slot| slot.map(|guid| map.signal(guid)).transpose())
                .collect::<Result<Vec<_>>>()?;
            let buses = record
                .buses
                .iter()
                .map(|slot| slot.map(|guid| map.bus(guid)).transpose())
                .collect::<Result<Vec<_>>>()?;

            let bindings = PortBindings::new()
                .with_partial_inputs(inputs)
                .with_partial_outputs(outputs)
                .with_partial_buses(buses);
            let id = network.instantiate_port(&record.entity, bindings)?;
            map.ports.insert(record.guid, id);
        }

        for record in &self.signals {
            let id = map.signal(record.guid)?;
            network.set_source_signal(id, record.source)?;
            let signal = network.signal_mut(id)?;
            signal.set_hold(record.hold);
            let properties = signal.properties_mut();
            properties.clear();
            for property in &record.properties {
                properties.add(property.clone());
            }
            let constraints = signal.constraints_mut();
            constraints.clear();
            for constraint in &record.constraints {
                constraints.add(constraint.clone());
            }
        }

        log::debug!(
            "restored {} signals, {} buses, {} ports",
            map.signals.len(),
            map.buses.len(),
            map.ports.len()
        );
        Ok(map)
    }
}
