//! Export snapshots to various formats

use crate::{Error, Result, Snapshot};
use std::io::Write;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// RON format (Rust Object Notation)
    Ron,
    /// JSON format (requires serde_json feature)
    Json,
    /// Human-readable text format
    Text,
}

/// Exporter for snapshot data
pub struct Exporter<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Exporter<'a> {
    /// Create a new exporter
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Export to a string in the specified format
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Ron => self.to_ron(),
            ExportFormat::Json => self.to_json(),
            ExportFormat::Text => Ok(self.to_text()),
        }
    }

    /// Export to a writer
    pub fn export_to<W: Write>(&self, writer: &mut W, format: ExportFormat) -> Result<()> {
        let content = self.export(format)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Export to RON format
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self.snapshot, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Export to JSON format
    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self.snapshot).map_err(|e| Error::Serialization(e.to_string()))
    }

    #[cfg(not(feature = "serde_json"))]
    pub fn to_json(&self) -> Result<String> {
        Err(Error::ExportError(
            "JSON export requires the 'serde_json' feature".to_string(),
        ))
    }

    /// Export to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        let snapshot = self.snapshot;

        output.push_str("=== Network Export ===\n\n");
        output.push_str(&format!("Signals: {}\n", snapshot.signals.len()));
        output.push_str(&format!("Buses: {}\n", snapshot.buses.len()));
        output.push_str(&format!("Ports: {}\n", snapshot.ports.len()));

        output.push_str("\n=== Signals ===\n\n");
        for signal in &snapshot.signals {
            let value = signal
                .value
                .as_ref()
                .map(|v| format!(" = {}", v))
                .unwrap_or_default();
            let mut flags = Vec::new();
            if signal.hold {
                flags.push("hold");
            }
            if signal.source {
                flags.push("source");
            }
            output.push_str(&format!("  #{} {}{}", signal.guid, signal.label, value));
            if !flags.is_empty() {
                output.push_str(&format!(" [{}]", flags.join(", ")));
            }
            output.push('\n');
            for property in &signal.properties {
                output.push_str(&format!("      property: {}\n", property.id));
            }
            for constraint in &signal.constraints {
                output.push_str(&format!("      constraint: {}\n", constraint.id));
            }
        }

        if !snapshot.buses.is_empty() {
            output.push_str("\n=== Buses ===\n\n");
            for bus in &snapshot.buses {
                let value = bus
                    .value
                    .as_ref()
                    .map(|v| format!(" = {}", v))
                    .unwrap_or_default();
                output.push_str(&format!("  #{} {}{}\n", bus.guid, bus.label, value));
            }
        }

        output.push_str("\n=== Ports ===\n\n");
        for port in &snapshot.ports {
            output.push_str(&format!(
                "  #{} {} ({})\n",
                port.guid,
                port.entity.id(),
                port.entity.symbol()
            ));
            output.push_str(&format!("      in:  {}\n", slots(&port.inputs)));
            output.push_str(&format!("      out: {}\n", slots(&port.outputs)));
            if !port.buses.is_empty() {
                output.push_str(&format!("      bus: {}\n", slots(&port.buses)));
            }
        }

        output
    }
}

fn slots(guids: &[Option<u64>]) -> String {
    let items: Vec<String> = guids
        .iter()
        .map(|slot| match slot {
            Some(guid) => format!("#{}", guid),
            None => "-".to_string(),
        })
        .collect();
    format!("[{}]", items.join(", "))
}
