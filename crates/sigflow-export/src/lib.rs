//! Sigflow Export - snapshot, export and restore of networks
//!
//! This crate builds on `sigflow-core`'s system-builder visitor to provide:
//!
//! - **Snapshot**: capture signals, buses and port topology with their state
//! - **Exporter**: export a snapshot to RON, JSON or text
//! - **Restore**: rebuild a snapshot in another network, remapping guids
//!
//! # Example
//!
//! ```
//! use sigflow_core::{ArchitectureTable, Network};
//! use sigflow_export::{ExportFormat, Exporter, Snapshot};
//!
//! let mut network = Network::with_library(Box::new(ArchitectureTable::new()));
//! network.create_signal_with_value("a", 1i64);
//!
//! let snapshot = Snapshot::capture(&network).unwrap();
//! let text = Exporter::new(&snapshot).export(ExportFormat::Ron).unwrap();
//!
//! let mut copy = Network::with_library(Box::new(ArchitectureTable::new()));
//! let map = Snapshot::from_ron(&text).unwrap().restore(&mut copy).unwrap();
//! assert_eq!(map.signals.len(), 1);
//! ```

mod error;
mod exporter;
mod restore;
mod snapshot;

pub use error::{Error, Result};
pub use exporter::{ExportFormat, Exporter};
pub use restore::GuidMap;
pub use snapshot::{BusRecord, PortRecord, SignalRecord, Snapshot, SnapshotBuilder};

#[cfg(test)]
mod tests {
    use super::*;
    use sigflow_core::{Identifier, Network, PortBindings, Property, Retention, Value};
    use sigflow_std::{add_entity, binary_entity, std_library, ArithmeticOp};

    fn sample() -> (Network, sigflow_core::SignalId) {
        let mut network = Network::with_library(Box::new(std_library()));
        let a = network.create_signal_with_value("a", 3i64);
        let b = network.create_signal_with_value("b", 4i64);
        network.signal_mut(a).unwrap().set_hold(true);
        network
            .signal_mut(b)
            .unwrap()
            .properties_mut()
            .add(Property::new(Identifier::new("Positive", "Test")).with_value(true));
        network
            .signal_mut(b)
            .unwrap()
            .constraints_mut()
            .add(Property::new(Identifier::new("Bounded", "Test")).with_retention(Retention::TRANSIENT));
        let clock = network.create_bus("clock");
        network.set_bus_value(clock, Some(Value::Toggle(true))).unwrap();

        let port = network
            .instantiate_port(&add_entity(), PortBindings::new().with_inputs([a, b]))
            .unwrap();
        let sum = network.port(port).unwrap().output(0).unwrap();
        network.execute_mathematical_operator(port).unwrap();
        (network, sum)
    }

    #[test]
    fn test_capture() {
        let (network, sum) = sample();
        let snapshot = Snapshot::capture(&network).unwrap();
        assert_eq!(snapshot.signals.len(), 3);
        assert_eq!(snapshot.buses.len(), 1);
        assert_eq!(snapshot.ports.len(), 1);

        let a = &snapshot.signals[0];
        assert_eq!(a.label, "a");
        assert!(a.hold);
        assert!(a.source);
        assert_eq!(snapshot.signals[1].properties.len(), 1);
        assert_eq!(snapshot.signals[1].constraints.len(), 1);

        let out = snapshot.signal(sum.raw()).unwrap();
        assert_eq!(out.value, Some(Value::Integer(7)));
        assert!(!out.source);

        let port = &snapshot.ports[0];
        assert!(!port.entity.is_generic());
        assert_eq!(port.inputs, vec![Some(a.guid), Some(snapshot.signals[1].guid)]);
        assert_eq!(port.outputs, vec![Some(sum.raw())]);
    }

    #[test]
    fn test_ron_restore_preserves_state() {
        let (network, _) = sample();
        let snapshot = Snapshot::capture(&network).unwrap();
        let text = Exporter::new(&snapshot).to_ron().unwrap();
        let parsed = Snapshot::from_ron(&text).unwrap();
        assert_eq!(parsed, snapshot);

        let mut copy = Network::with_library(Box::new(std_library()));
        // shift ids so the remap is not the identity
        copy.create_signal("padding");
        let map = parsed.restore(&mut copy).unwrap();
        assert_eq!(Snapshot::capture(&copy).unwrap().ports.len(), 1);

        let port = map.port(snapshot.ports[0].guid).unwrap();
        assert!(copy.has_architecture_link(port).unwrap());
        for record in &snapshot.signals {
            let signal = copy.signal(map.signal(record.guid).unwrap()).unwrap();
            assert_eq!(signal.label(), record.label);
            assert_eq!(signal.hold(), record.hold);
            assert_eq!(signal.is_source_signal(), record.source);
            assert_eq!(signal.value(), record.value.as_ref());
            assert_eq!(signal.properties().len(), record.properties.len());
            assert_eq!(signal.constraints().len(), record.constraints.len());
        }
        let bus = copy.bus(map.bus(snapshot.buses[0].guid).unwrap()).unwrap();
        assert_eq!(bus.value(), Some(&Value::Toggle(true)));
        assert_eq!(bus.label(), "clock");
    }

    #[test]
    fn test_restore_keeps_cycle_counts() {
        let counts = |network: &Network| -> Vec<usize> {
            network.signals().map(|s| s.cycles()).collect()
        };
        let mut network = Network::with_library(Box::new(std_library()));
        let a = network.create_signal_with_value("a", 1i64);
        let b = network.create_signal("b");
        let c = network.create_signal_with_value("c", 2i64);
        network
            .instantiate_port(
                &add_entity(),
                PortBindings::new().with_inputs([a, c]).with_outputs([b]),
            )
            .unwrap();
        // b cuts the loop before it is closed
        network.set_source_signal(b, true).unwrap();
        network
            .instantiate_port(
                &add_entity(),
                PortBindings::new().with_inputs([b, c]).with_outputs([a]),
            )
            .unwrap();
        assert_eq!(counts(&network), vec![0, 0, 0]);

        let snapshot = Snapshot::capture(&network).unwrap();
        let mut copy = Network::with_library(Box::new(std_library()));
        let map = snapshot.restore(&mut copy).unwrap();
        let restored_b = map.signal(b.raw()).unwrap();
        assert!(copy.signal(restored_b).unwrap().is_source_signal());
        assert_eq!(counts(&copy), counts(&network));

        network.set_source_signal(b, false).unwrap();
        copy.set_source_signal(restored_b, false).unwrap();
        assert_eq!(counts(&network), vec![1, 1, 0]);
        assert_eq!(counts(&copy), counts(&network));
    }

    #[test]
    fn test_restore_unknown_guid() {
        let mut snapshot = Snapshot::default();
        snapshot.ports.push(PortRecord {
            guid: 0,
            entity: binary_entity(ArithmeticOp::Add),
            inputs: vec![Some(41), Some(42)],
            outputs: vec![None],
            buses: Vec::new(),
        });
        let mut network = Network::with_library(Box::new(std_library()));
        assert!(matches!(
            snapshot.restore(&mut network),
            Err(Error::UnknownGuid { kind: "signal", guid: 41 })
        ));
    }

    #[test]
    fn test_text_export() {
        let (network, _) = sample();
        let snapshot = Snapshot::capture(&network).unwrap();
        let text = Exporter::new(&snapshot).export(ExportFormat::Text).unwrap();
        assert!(text.contains("Signals: 3"));
        assert!(text.contains("a = 3 [hold, source]"));
        assert!(text.contains("Std.Add (+)"));
        assert!(text.contains("property: Test.Positive"));
    }

    #[test]
    fn test_export_to_writer() {
        let (network, _) = sample();
        let snapshot = Snapshot::capture(&network).unwrap();
        let mut buffer = Vec::new();
        Exporter::new(&snapshot)
            .export_to(&mut buffer, ExportFormat::Ron)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(Snapshot::from_ron(&text).unwrap(), snapshot);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_json_round_trip() {
        let (network, _) = sample();
        let snapshot = Snapshot::capture(&network).unwrap();
        let json = Exporter::new(&snapshot).to_json().unwrap();
        assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    }

    #[cfg(not(feature = "serde_json"))]
    #[test]
    fn test_json_requires_feature() {
        let snapshot = Snapshot::default();
        assert!(matches!(
            Exporter::new(&snapshot).to_json(),
            Err(Error::ExportError(_))
        ));
    }
}
