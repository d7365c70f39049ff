//! Process-based arithmetic architectures
//!
//! An instance registers one [`ArithmeticProcess`] sensitive to every input
//! of its port. The process folds the input values left to right and posts
//! the result to the single output; while any input has no value it waits.

use crate::ArithmeticOp;
use sigflow_core::{
    Architecture, ArchitectureState, Error, Identifier, Network, Port, Process, ProcessContext,
    ProcessSignals, Result, SignalId, SlotKind, STD_DOMAIN,
};

/// Architecture implementing one arithmetic operator
#[derive(Debug, Clone)]
pub struct ArithmeticArchitecture {
    state: ArchitectureState,
    op: ArithmeticOp,
}

impl ArithmeticArchitecture {
    /// Unbound template for `op`
    pub fn template(op: ArithmeticOp) -> Self {
        Self {
            state: ArchitectureState::template(
                Identifier::new(format!("{}Process", op.name()), STD_DOMAIN),
                op.entity_id(),
            ),
            op,
        }
    }

    pub fn op(&self) -> ArithmeticOp {
        self.op
    }
}

impl Architecture for ArithmeticArchitecture {
    fn state(&self) -> &ArchitectureState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ArchitectureState {
        &mut self.state
    }

    fn instantiate_to_port(&self, port: &Port) -> Box<dyn Architecture> {
        Box::new(Self {
            state: self.state.instance(port.id()),
            op: self.op,
        })
    }

    fn register_architecture(&mut self, network: &mut Network) -> Result<()> {
        let port = self.state.require_port()?;
        let signals = ProcessSignals::for_port(network.port(port)?);
        let output = signals.outputs.first().copied().ok_or_else(|| {
            Error::invalid(format!("{} needs an output signal on {}", self.state.id(), port))
        })?;
        let process = ArithmeticProcess {
            op: self.op,
            inputs: signals.inputs.clone(),
            output,
        };
        let id = network.register_process(Box::new(process), &signals)?;
        self.state.add_process(id);
        log::trace!("{} registered {} on {}", self.state.id(), id, port);
        Ok(())
    }

    fn is_mathematical_operator(&self) -> bool {
        true
    }

    fn supports_port(&self, port: &Port) -> bool {
        port.entity().id() == self.state.entity_id() && port.slot_count(SlotKind::Output) == 1
    }
}

/// Folds the port's inputs into its output
#[derive(Debug, Clone)]
pub struct ArithmeticProcess {
    op: ArithmeticOp,
    inputs: Vec<SignalId>,
    output: SignalId,
}

impl Process for ArithmeticProcess {
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
        let mut values = Vec::with_capacity(self.inputs.len());
        for &input in &self.inputs {
            match ctx.value(input)? {
                Some(value) => values.push(value.clone()),
                None => {
                    log::trace!("{} waits for a value on {}", self.op.name(), input);
                    return Ok(());
                }
            }
        }
        let result = self.op.fold(&values)?;
        ctx.post_new_value(self.output, result)
    }
}
