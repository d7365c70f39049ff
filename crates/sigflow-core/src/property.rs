//! Property and constraint bags attached to signals and buses

use crate::{Identifier, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A structural or value change that may invalidate properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyTrigger {
    /// The signal became driven by a port
    Driven,
    /// The signal lost its driving port
    Undriven,
    /// A new value was applied
    ValueChanged,
}

/// Which triggers a property survives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retention {
    pub on_drive: bool,
    pub on_undrive: bool,
    pub on_value_change: bool,
}

impl Retention {
    /// Survives every trigger
    pub const PERMANENT: Retention = Retention {
        on_drive: true,
        on_undrive: true,
        on_value_change: true,
    };

    /// Dropped by any trigger
    pub const TRANSIENT: Retention = Retention {
        on_drive: false,
        on_undrive: false,
        on_value_change: false,
    };

    /// Dropped when the drive state changes, kept across value changes
    pub const STRUCTURAL: Retention = Retention {
        on_drive: false,
        on_undrive: false,
        on_value_change: true,
    };

    pub fn survives(&self, trigger: PropertyTrigger) -> bool {
        match trigger {
            PropertyTrigger::Driven => self.on_drive,
            PropertyTrigger::Undriven => self.on_undrive,
            PropertyTrigger::ValueChanged => self.on_value_change,
        }
    }
}

impl Default for Retention {
    fn default() -> Self {
        Retention::PERMANENT
    }
}

/// A named property, optionally carrying a value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: Identifier,
    pub value: Option<Value>,
    pub retention: Retention,
}

impl Property {
    /// Create a permanent flag-like property
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            value: None,
            retention: Retention::PERMANENT,
        }
    }

    /// Attach a value
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the retention rule
    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Check if this property is still valid after `trigger`
    pub fn still_valid_after(&self, trigger: PropertyTrigger) -> bool {
        self.retention.survives(trigger)
    }
}

/// Ordered collection of properties keyed by identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    items: IndexMap<Identifier, Property>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a property, returning the replaced one
    pub fn add(&mut self, property: Property) -> Option<Property> {
        self.items.insert(property.id.clone(), property)
    }

    pub fn remove(&mut self, id: &Identifier) -> Option<Property> {
        self.items.shift_remove(id)
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &Identifier) -> Option<&Property> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.items.values()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop every property that does not survive `trigger`
    ///
    /// Returns the identifiers of the removed properties.
    pub fn validate(&mut self, trigger: PropertyTrigger) -> Vec<Identifier> {
        let removed: Vec<Identifier> = self
            .items
            .values()
            .filter(|p| !p.still_valid_after(trigger))
            .map(|p| p.id.clone())
            .collect();
        for id in &removed {
            self.items.shift_remove(id);
        }
        removed
    }
}

impl FromIterator<Property> for PropertyBag {
    fn from_iter<T: IntoIterator<Item = Property>>(iter: T) -> Self {
        let mut bag = PropertyBag::new();
        for property in iter {
            bag.add(property);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(label: &str) -> Identifier {
        Identifier::new(label, "Test")
    }

    #[test]
    fn test_bag_add_replace_remove() {
        let mut bag = PropertyBag::new();
        assert!(bag.add(Property::new(id("Constant"))).is_none());
        let replaced = bag.add(Property::new(id("Constant")).with_value(3i64));
        assert!(replaced.is_some());
        assert_eq!(bag.len(), 1);
        assert_eq!(
            bag.get(&id("Constant")).and_then(|p| p.value.clone()),
            Some(Value::Integer(3))
        );
        assert!(bag.remove(&id("Constant")).is_some());
        assert!(bag.is_empty());
    }

    #[test]
    fn test_validate_drops_by_retention() {
        let mut bag = PropertyBag::new();
        bag.add(Property::new(id("Permanent")));
        bag.add(Property::new(id("Structural")).with_retention(Retention::STRUCTURAL));
        bag.add(Property::new(id("Transient")).with_retention(Retention::TRANSIENT));

        let removed = bag.validate(PropertyTrigger::ValueChanged);
        assert_eq!(removed, vec![id("Transient")]);

        let removed = bag.validate(PropertyTrigger::Driven);
        assert_eq!(removed, vec![id("Structural")]);
        assert!(bag.contains(&id("Permanent")));
        assert_eq!(bag.len(), 1);
    }
}
