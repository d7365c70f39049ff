//! Serializable capture of a network's topology and state

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sigflow_core::{Bus, Entity, Network, Port, Property, Signal, SystemBuilder, Value};

/// Captured signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub guid: u64,
    pub label: String,
    pub hold: bool,
    pub source: bool,
    pub value: Option<Value>,
    pub properties: Vec<Property>,
    pub constraints: Vec<Property>,
}

/// Captured bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusRecord {
    pub guid: u64,
    pub label: String,
    pub hold: bool,
    pub value: Option<Value>,
    pub properties: Vec<Property>,
}

/// Captured port: the concrete entity and slot → guid tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortRecord {
    pub guid: u64,
    pub entity: Entity,
    pub inputs: Vec<Option<u64>>,
    pub outputs: Vec<Option<u64>>,
    pub buses: Vec<Option<u64>>,
}

/// Complete capture of a network
///
/// Guids are the raw ids of the captured network; they are remapped to fresh
/// ids on [`restore`](Snapshot::restore).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub signals: Vec<SignalRecord>,
    pub buses: Vec<BusRecord>,
    pub ports: Vec<PortRecord>,
}

impl Snapshot {
    /// Capture every signal, bus and port of `network`
    pub fn capture(network: &Network) -> Result<Self> {
        let mut builder = SnapshotBuilder::new();
        network.accept_system_builder(&mut builder)?;
        Ok(builder.finish())
    }

    /// Parse a snapshot previously exported as RON
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Parse a snapshot previously exported as JSON
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty() && self.buses.is_empty() && self.ports.is_empty()
    }

    pub fn signal(&self, guid: u64) -> Option<&SignalRecord> {
        self.signals.iter().find(|s| s.guid == guid)
    }
}

/// [`SystemBuilder`] collecting records into a [`Snapshot`]
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Snapshot {
        self.snapshot
    }
}

impl SystemBuilder for SnapshotBuilder {
    fn begin_system(
        &mut self,
        signals: usize,
        buses: usize,
        ports: usize,
    ) -> sigflow_core::Result<()> {
        self.snapshot = Snapshot {
            signals: Vec::with_capacity(signals),
            buses: Vec::with_capacity(buses),
            ports: Vec::with_capacity(ports),
        };
        Ok(())
    }

    fn build_signal(&mut self, signal: &Signal) -> sigflow_core::Result<()> {
        self.snapshot.signals.push(SignalRecord {
            guid: signal.id().raw(),
            label: signal.label().to_string(),
            hold: signal.hold(),
            source: signal.is_source_signal(),
            value: signal.value().cloned(),
            properties: signal.properties().iter().cloned().collect(),
            constraints: signal.constraints().iter().cloned().collect(),
        });
        Ok(())
    }

    fn build_bus(&mut self, bus: &Bus) -> sigflow_core::Result<()> {
        self.snapshot.buses.push(BusRecord {
            guid: bus.id().raw(),
            label: bus.label().to_string(),
            hold: bus.hold(),
            value: bus.value().cloned(),
            properties: bus.properties().iter().cloned().collect(),
        });
        Ok(())
    }

    fn build_port(&mut self, port: &Port) -> sigflow_core::Result<()> {
        self.snapshot.ports.push(PortRecord {
            guid: port.id().raw(),
            entity: port.entity().clone(),
            inputs: port.inputs().iter().map(|s| s.map(|id| id.raw())).collect(),
            outputs: port.outputs().iter().map(|s| s.map(|id| id.raw())).collect(),
            buses: port.buses().iter().map(|b| b.map(|id| id.raw())).collect(),
        });
        Ok(())
    }

    fn end_system(&mut self) -> sigflow_core::Result<()> {
        log::debug!(
            "captured {} signals, {} buses, {} ports",
            self.snapshot.signals.len(),
            self.snapshot.buses.len(),
            self.snapshot.ports.len()
        );
        Ok(())
    }
}
