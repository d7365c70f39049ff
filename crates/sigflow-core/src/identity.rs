//! Identity types for definitions and graph nodes

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for an entity, architecture or value structure definition
///
/// Ordered by domain first, then label. Displayed as `Domain.Label`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    domain: String,
    label: String,
}

impl Identifier {
    /// Create a new identifier
    pub fn new(label: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            label: label.into(),
        }
    }

    /// The label part (e.g. `Add`)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The domain part (e.g. `Std`)
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.label)
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((domain, label)) if !domain.is_empty() && !label.is_empty() => {
                Ok(Identifier::new(label, domain))
            }
            _ => Err(Error::invalid(format!(
                "identifier '{}' is not of the form Domain.Label",
                s
            ))),
        }
    }
}

macro_rules! node_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a new ID
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw ID value
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

node_id!(
    /// Stable handle of a signal inside a [`Network`](crate::Network)
    SignalId,
    "signal"
);
node_id!(
    /// Stable handle of a bus inside a [`Network`](crate::Network)
    BusId,
    "bus"
);
node_id!(
    /// Stable handle of a port inside a [`Network`](crate::Network)
    PortId,
    "port"
);
node_id!(
    /// Stable handle of a registered process
    ProcessId,
    "process"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_order_domain_first() {
        let a = Identifier::new("Zeta", "Alpha");
        let b = Identifier::new("Alpha", "Beta");
        let c = Identifier::new("Beta", "Beta");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_identifier_parse_and_display() {
        let id: Identifier = "Std.Add".parse().unwrap();
        assert_eq!(id.domain(), "Std");
        assert_eq!(id.label(), "Add");
        assert_eq!(format!("{}", id), "Std.Add");
        assert_eq!(id, Identifier::new("Add", "Std"));

        assert!("Add".parse::<Identifier>().is_err());
        assert!(".Add".parse::<Identifier>().is_err());
    }

    #[test]
    fn test_node_ids() {
        let id = SignalId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{}", id), "signal:7");
        assert_eq!(format!("{}", PortId::new(2)), "port:2");
    }
}
