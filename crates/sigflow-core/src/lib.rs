//! Sigflow Core - signal/port dataflow engine
//!
//! This crate provides the mutable dataflow graph at the heart of sigflow:
//! - Typed values (`Value`) held by signals and buses
//! - Entities describing named input/output/bus slots
//! - Ports binding signals and buses to an entity's slots
//! - Architectures linked to completely connected ports
//! - Processes re-executed when sensed signals change
//! - Feedback-loop bookkeeping on every binding change
//!
//! ## Ownership
//!
//! All nodes live in a [`Network`] arena and refer to each other by id
//! (`SignalId`, `BusId`, `PortId`, `ProcessId`). Collaborators are injected
//! at construction:
//! - [`Library`] - architecture lookup
//! - [`Mediator`] - observer of structural changes
//! - [`Scheduler`] - delta and delayed value events
//! - [`Scanner`] - reachability for dependency queries
//!
//! ## Example
//!
//! ```
//! use sigflow_core::{ArchitectureTable, Entity, Identifier, Network, PortBindings};
//!
//! let mut network = Network::with_library(Box::new(ArchitectureTable::new()));
//! let entity = Entity::new(Identifier::new("Neg", "Demo"), "-")
//!     .with_inputs(["x"])
//!     .with_outputs(["y"]);
//!
//! let port = network.instantiate_port(&entity, PortBindings::new()).unwrap();
//! assert!(!network.port(port).unwrap().is_completely_connected());
//!
//! let x = network.create_signal("x");
//! network.add_input_signal_binding(port, 0, x).unwrap();
//! assert!(network.port(port).unwrap().is_completely_connected());
//! ```

mod architecture;
mod binding;
mod builder;
mod bus;
mod config;
mod cycles;
mod entity;
mod error;
mod identity;
mod library;
mod mediator;
mod network;
mod port;
mod process;
mod property;
mod scanner;
mod scheduler;
mod signal;
mod value;

#[cfg(test)]
mod testing;

pub use architecture::{Architecture, ArchitectureState};
pub use builder::SystemBuilder;
pub use bus::Bus;
pub use config::{NetworkConfig, DEFAULT_MAX_DELTA_CYCLES};
pub use entity::{Entity, SlotKind};
pub use error::{Error, Result};
pub use identity::{BusId, Identifier, PortId, ProcessId, SignalId};
pub use library::{ArchitectureTable, Library};
pub use mediator::{Mediator, Notification, NullMediator, RecordingMediator};
pub use network::{Dependency, Network};
pub use port::{Port, PortBindings, TraversalTag};
pub use process::{Process, ProcessContext, ProcessSignals};
pub use property::{Property, PropertyBag, PropertyTrigger, Retention};
pub use scanner::{Scanner, UpstreamScanner};
pub use scheduler::{DeltaScheduler, Scheduler, SignalEvent, Writer};
pub use signal::Signal;
pub use value::{Complex, LogicLevel, Rational, Value, ValueKind, STD_DOMAIN};
