//! Feedback-loop bookkeeping
//!
//! Binding an input `i` on a port whose output `o` is bound (or the other way
//! around) may close a feedback loop: `o` reaches `i` through the driving
//! chain upstream of `i`. Every signal on such a loop carries the number of
//! distinct paths found, so `Signal::is_cyclic` is a constant-time check.
//!
//! Walks are symmetric: the decrement for a slot runs while the slot is still
//! bound, against the same topology the increment saw. Source flags cut the
//! walk, so flipping one re-counts every input slot downstream of the signal.

use crate::{port::TraversalTag, Error, Network, PortId, Result, SignalId};
use indexmap::IndexSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CycleUpdate {
    Add,
    Remove,
}

impl Network {
    /// Mark a driven signal as independent input, or clear the mark
    ///
    /// Ignored while the signal is undriven. Input slots of every port
    /// downstream of the signal are detached from the count, the flag is
    /// changed and the slots are counted again in reverse order.
    pub fn set_source_signal(&mut self, signal: SignalId, source: bool) -> Result<()> {
        let current = self.signal(signal)?;
        if !current.is_driven() || current.is_source_signal() == source {
            return Ok(());
        }

        let mut detached = Vec::new();
        for port in self.ports_downstream_of(signal) {
            let inputs: Vec<(usize, SignalId)> = self
                .port(port)?
                .inputs()
                .iter()
                .enumerate()
                .filter_map(|(index, slot)| slot.map(|s| (index, s)))
                .collect();
            for (index, input) in inputs {
                self.update_cycles_for_input(port, input, CycleUpdate::Remove);
                self.port_mut(port)?.set_input(index, None);
                detached.push((port, index, input));
            }
        }

        self.signals
            .get_mut(&signal)
            .ok_or(Error::SignalNotFound(signal))?
            .set_source_signal(source);

        while let Some((port, index, input)) = detached.pop() {
            self.port_mut(port)?.set_input(index, Some(input));
            self.update_cycles_for_input(port, input, CycleUpdate::Add);
        }
        log::debug!("{} source flag set to {}", signal, source);
        Ok(())
    }

    /// Ports reachable from `signal` through fan-out and driven outputs
    fn ports_downstream_of(&self, signal: SignalId) -> IndexSet<PortId> {
        let mut ports = IndexSet::new();
        let mut frontier = vec![signal];
        while let Some(next) = frontier.pop() {
            let Some(s) = self.signals.get(&next) else {
                continue;
            };
            for &(port, _) in s.fan_out() {
                if ports.insert(port) {
                    if let Some(p) = self.ports.get(&port) {
                        frontier.extend(p.output_signals());
                    }
                }
            }
        }
        ports
    }

    /// Update counts between `input` and every bound output of `port`
    pub(crate) fn update_cycles_for_input(
        &mut self,
        port: PortId,
        input: SignalId,
        update: CycleUpdate,
    ) {
        let outputs: Vec<SignalId> = match self.ports.get(&port) {
            Some(p) => p.output_signals().collect(),
            None => return,
        };
        for output in outputs {
            self.update_cycles(input, output, update);
        }
    }

    /// Update counts between `output` and every bound input of `port`
    pub(crate) fn update_cycles_for_output(
        &mut self,
        port: PortId,
        output: SignalId,
        update: CycleUpdate,
    ) {
        let inputs: Vec<SignalId> = match self.ports.get(&port) {
            Some(p) => p.input_signals().collect(),
            None => return,
        };
        for input in inputs {
            self.update_cycles(input, output, update);
        }
    }

    fn update_cycles(&mut self, input: SignalId, output: SignalId, update: CycleUpdate) {
        let tag = self.tags.next_tag();
        let paths = self.walk_cycles(input, output, tag, update);
        if paths > 0 {
            log::trace!("{:?} {} feedback paths from {} to {}", update, paths, output, input);
        }
    }

    /// Count paths from `target` back to `signal` and apply them on the way
    fn walk_cycles(
        &mut self,
        signal: SignalId,
        target: SignalId,
        tag: TraversalTag,
        update: CycleUpdate,
    ) -> usize {
        let paths = if signal == target {
            1
        } else {
            let driver = match self.signals.get(&signal) {
                Some(s) if !s.is_source_signal() => s.driven_by_port(),
                _ => None,
            };
            let upstream: Vec<SignalId> = match driver.and_then(|id| self.ports.get_mut(&id)) {
                Some(port) => {
                    if port.mark_visited(tag) {
                        port.input_signals().collect()
                    } else {
                        Vec::new()
                    }
                }
                None => Vec::new(),
            };
            upstream
                .into_iter()
                .map(|next| self.walk_cycles(next, target, tag, update))
                .sum()
        };

        if paths > 0 {
            if let Some(s) = self.signals.get_mut(&signal) {
                match update {
                    CycleUpdate::Add => s.add_cycles(paths),
                    CycleUpdate::Remove => s.remove_cycles(paths),
                }
            }
        }
        paths
    }
}
