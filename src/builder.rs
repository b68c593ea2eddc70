use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::ContainerOptions;
use crate::container::Container;
use crate::definition::ProviderDefinition;
use crate::error::Result;
use crate::representation::{ContainerRepresentation, SharedRepresentation};

/// Assemble the registry of a container before building it.
///
/// A builder started [from an existing container](ContainerBuilder::from_existing) works on a copy
/// of its registry: overrides only apply to the new container. A builder [sharing](ContainerBuilder::sharing)
/// the registry of a container applies them to both.
pub struct ContainerBuilder {
    representation: SharedRepresentation,
    parent: Option<Container>,
    options: ContainerOptions,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            representation: ContainerRepresentation::new().into_shared(),
            parent: None,
            options: ContainerOptions::default(),
        }
    }

    /// Start from a copy of the definitions, parent and options of a container
    pub fn from_existing(container: &Container) -> Self {
        let copy = container.representation().read().clone();
        Self {
            representation: Arc::new(RwLock::new(copy)),
            parent: container.parent().cloned(),
            options: container.options().clone(),
        }
    }

    /// Start from the same registry as a container, later changes are visible to both
    pub fn sharing(container: &Container) -> Self {
        Self {
            representation: container.representation(),
            parent: container.parent().cloned(),
            options: container.options().clone(),
        }
    }

    pub fn register(self, definition: ProviderDefinition) -> Result<Self> {
        self.representation.write().register_provider(definition)?;
        Ok(self)
    }

    pub fn override_provider(self, definition: ProviderDefinition) -> Result<Self> {
        self.representation.write().override_provider(definition)?;
        Ok(self)
    }

    pub fn with_parent(mut self, parent: &Container) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn with_options(mut self, options: ContainerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Container {
        Container::with_options(self.representation, self.parent.as_ref(), self.options)
    }
}
