//! Configuration sources: named, prioritized groups of producers.

use crate::producer::ComponentProducer;

/// A named group of component producers.
///
/// The priority orders sources against each other (lower first). It may be
/// set here or supplied by the host through settings; a source that ends up
/// with neither is rejected when the container is built.
#[derive(Debug)]
pub struct ConfigurationSource {
    name: String,
    priority: Option<i32>,
    producers: Vec<ComponentProducer>,
}

impl ConfigurationSource {
    /// Creates a source without a priority.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: None,
            producers: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Adds a producer. Declaration order breaks priority ties.
    pub fn producer(mut self, producer: ComponentProducer) -> Self {
        self.producers.push(producer);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    pub fn producers(&self) -> &[ComponentProducer] {
        &self.producers
    }

    pub(crate) fn into_producers(self) -> Vec<ComponentProducer> {
        self.producers
    }
}
