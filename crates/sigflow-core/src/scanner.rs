//! Reachability queries through driving chains

use crate::{Network, Port, PortId, Signal, SignalId};
use std::collections::HashSet;

/// Graph scanner used by dependency queries
///
/// Both queries walk upstream from `root`: from a signal to the port driving
/// it, and from that port to its bound inputs. The root itself is only
/// matched when it is reached again through a feedback loop.
pub trait Scanner {
    /// Check whether an upstream signal satisfies `predicate`
    fn exists_signal(
        &self,
        network: &Network,
        root: SignalId,
        predicate: &dyn Fn(&Signal) -> bool,
        deep: bool,
    ) -> bool;

    /// Check whether an upstream port satisfies `predicate`
    fn exists_port(
        &self,
        network: &Network,
        root: SignalId,
        predicate: &dyn Fn(&Port) -> bool,
        deep: bool,
    ) -> bool;
}

/// Depth-first upstream scanner
///
/// A non-deep scan stops at source signals and held signals; a deep scan
/// follows every driven signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpstreamScanner;

impl UpstreamScanner {
    fn upstream_port(signal: &Signal, deep: bool) -> Option<PortId> {
        if !deep && (signal.is_source_signal() || signal.hold()) {
            return None;
        }
        signal.driven_by_port()
    }

    fn walk(
        network: &Network,
        root: SignalId,
        deep: bool,
        on_signal: &dyn Fn(&Signal) -> bool,
        on_port: &dyn Fn(&Port) -> bool,
    ) -> bool {
        let mut pending: Vec<PortId> = match network.signal(root) {
            Ok(signal) => Self::upstream_port(signal, deep).into_iter().collect(),
            Err(_) => return false,
        };
        let mut visited = HashSet::new();

        while let Some(port_id) = pending.pop() {
            if !visited.insert(port_id) {
                continue;
            }
            let Ok(port) = network.port(port_id) else {
                continue;
            };
            if on_port(port) {
                return true;
            }
            for input in port.input_signals() {
                let Ok(signal) = network.signal(input) else {
                    continue;
                };
                if on_signal(signal) {
                    return true;
                }
                if let Some(next) = Self::upstream_port(signal, deep) {
                    pending.push(next);
                }
            }
        }
        false
    }
}

impl Scanner for UpstreamScanner {
    fn exists_signal(
        &self,
        network: &Network,
        root: SignalId,
        predicate: &dyn Fn(&Signal) -> bool,
        deep: bool,
    ) -> bool {
        Self::walk(network, root, deep, predicate, &|_| false)
    }

    fn exists_port(
        &self,
        network: &Network,
        root: SignalId,
        predicate: &dyn Fn(&Port) -> bool,
        deep: bool,
    ) -> bool {
        Self::walk(network, root, deep, &|_| false, predicate)
    }
}
