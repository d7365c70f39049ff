//! Shared fixtures for unit tests

use crate::{
    Architecture, ArchitectureState, ArchitectureTable, DeltaScheduler, Entity, Identifier,
    Network, NetworkConfig, Port, Process, ProcessContext, ProcessSignals, RecordingMediator,
    Result, SignalId,
};

pub(crate) const RELAY_ARCHITECTURE: &str = "RelayImpl";

/// One input, one output; copies the input value to the output
pub(crate) fn relay_entity() -> Entity {
    Entity::new(Identifier::new("Relay", "Test"), "=")
        .with_inputs(["in"])
        .with_outputs(["out"])
}

pub(crate) fn relay_library() -> ArchitectureTable {
    ArchitectureTable::new().with(Box::new(RelayArchitecture {
        state: ArchitectureState::template(
            Identifier::new(RELAY_ARCHITECTURE, "Test"),
            relay_entity().id().clone(),
        ),
    }))
}

/// Network over the relay library with a recording mediator
pub(crate) fn test_network() -> (Network, RecordingMediator) {
    let mediator = RecordingMediator::new();
    let network = Network::new(
        NetworkConfig::default(),
        Box::new(relay_library()),
        Box::new(mediator.clone()),
        Box::new(DeltaScheduler::new()),
    );
    (network, mediator)
}

#[derive(Debug)]
pub(crate) struct RelayArchitecture {
    state: ArchitectureState,
}

impl Architecture for RelayArchitecture {
    fn state(&self) -> &ArchitectureState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ArchitectureState {
        &mut self.state
    }

    fn instantiate_to_port(&self, port: &Port) -> Box<dyn Architecture> {
        Box::new(RelayArchitecture {
            state: self.state.instance(port.id()),
        })
    }

    fn register_architecture(&mut self, network: &mut Network) -> Result<()> {
        let port = self.state.require_port()?;
        let signals = ProcessSignals::for_port(network.port(port)?);
        let process = network.register_process(
            Box::new(RelayProcess {
                outputs: signals.outputs.clone(),
            }),
            &signals,
        )?;
        self.state.add_process(process);
        Ok(())
    }

    fn is_mathematical_operator(&self) -> bool {
        true
    }
}

#[derive(Debug)]
struct RelayProcess {
    outputs: Vec<SignalId>,
}

impl Process for RelayProcess {
    fn register(&mut self, ctx: &mut ProcessContext<'_>, signals: &ProcessSignals) -> Result<()> {
        for &input in &signals.inputs {
            ctx.sense_signal(input)?;
        }
        Ok(())
    }

    fn action(
        &mut self,
        ctx: &mut ProcessContext<'_>,
        _is_init: bool,
        _origin: Option<SignalId>,
    ) -> Result<()> {
        let Some(&input) = ctx.network().sensitivity(ctx.process_id())?.first() else {
            return Ok(());
        };
        if let Some(value) = ctx.value(input)?.cloned() {
            for &output in &self.outputs {
                ctx.post_new_value(output, value.clone())?;
            }
        }
        Ok(())
    }
}

/// Deterministic xorshift generator for randomized tests
pub(crate) struct XorShift(u64);

impl XorShift {
    pub(crate) fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform-ish index in `0..n`
    pub(crate) fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PortBindings, Value};

    #[test]
    fn test_relay_propagates_through_chain() {
        let (mut network, _) = test_network();
        let a = network.create_signal("a");
        let first = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([a]))
            .unwrap();
        let mid = network.port(first).unwrap().output(0).unwrap();
        let second = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([mid]))
            .unwrap();
        let out = network.port(second).unwrap().output(0).unwrap();

        network.post_new_value(a, 9i64).unwrap();
        assert_eq!(network.run_until_stable().unwrap(), 3);
        assert_eq!(network.value(out).unwrap(), Some(&Value::Integer(9)));
    }

    #[test]
    fn test_execute_relay_operator() {
        let (mut network, _) = test_network();
        let a = network.create_signal_with_value("a", "hello");
        let port = network
            .instantiate_port(&relay_entity(), PortBindings::new().with_inputs([a]))
            .unwrap();
        let outputs = network.execute_mathematical_operator(port).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(
            network.value(outputs[0]).unwrap(),
            Some(&Value::Literal("hello".to_string()))
        );
    }
}
