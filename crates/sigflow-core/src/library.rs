//! Architecture lookup
//!
//! The network never constructs architectures itself: when a port becomes
//! completely connected it asks its [`Library`] for a template supporting the
//! port and instantiates that template to the port.

use crate::{Architecture, Identifier, Port};
use indexmap::IndexMap;

/// Lookup service for architecture templates
pub trait Library {
    /// Check whether some template supports `port`
    fn contains_architecture(&self, port: &Port) -> bool;

    /// Find a template supporting `port`
    fn lookup_architecture(&self, port: &Port) -> Option<&dyn Architecture>;
}

/// A library of templates keyed by the entity they implement
///
/// Templates registered for the same entity are tried in insertion order.
#[derive(Debug, Default)]
pub struct ArchitectureTable {
    templates: IndexMap<Identifier, Vec<Box<dyn Architecture>>>,
}

impl ArchitectureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template
    pub fn insert(&mut self, template: Box<dyn Architecture>) {
        let entity = template.entity_id().clone();
        self.templates.entry(entity).or_default().push(template);
    }

    /// Register a template (builder style)
    pub fn with(mut self, template: Box<dyn Architecture>) -> Self {
        self.insert(template);
        self
    }

    /// Templates registered for an entity
    pub fn templates_for(&self, entity: &Identifier) -> impl Iterator<Item = &dyn Architecture> {
        self.templates
            .get(entity)
            .into_iter()
            .flat_map(|list| list.iter().map(|t| t.as_ref()))
    }

    /// Entities with at least one template
    pub fn entity_ids(&self) -> impl Iterator<Item = &Identifier> {
        self.templates.keys()
    }

    /// Total number of templates
    pub fn len(&self) -> usize {
        self.templates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Library for ArchitectureTable {
    fn contains_architecture(&self, port: &Port) -> bool {
        self.lookup_architecture(port).is_some()
    }

    fn lookup_architecture(&self, port: &Port) -> Option<&dyn Architecture> {
        self.templates_for(port.entity().id())
            .find(|template| template.supports_port(port))
    }
}
