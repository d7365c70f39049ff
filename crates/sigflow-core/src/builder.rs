//! Visitor used to serialize a network
//!
//! [`Network::accept_system_builder`] walks all signals, then all buses, then
//! all ports, in creation order. Ports refer to signals and buses by id, so a
//! builder sees every referenced node before the port that binds it.

use crate::{Bus, Network, Port, Result, Signal};

/// Receiver of a network walk
pub trait SystemBuilder {
    fn begin_system(&mut self, signals: usize, buses: usize, ports: usize) -> Result<()>;

    fn build_signal(&mut self, signal: &Signal) -> Result<()>;

    fn build_bus(&mut self, bus: &Bus) -> Result<()>;

    fn build_port(&mut self, port: &Port) -> Result<()>;

    fn end_system(&mut self) -> Result<()>;
}

impl Network {
    /// Drive `builder` over every node of the network
    pub fn accept_system_builder<B: SystemBuilder + ?Sized>(&self, builder: &mut B) -> Result<()> {
        builder.begin_system(self.signal_count(), self.bus_count(), self.port_count())?;
        for signal in self.signals() {
            builder.build_signal(signal)?;
        }
        for bus in self.buses() {
            builder.build_bus(bus)?;
        }
        for port in self.ports() {
            builder.build_port(port)?;
        }
        builder.end_system()
    }
}
