//! Per-container registry of provider definitions.
//!
//! The representation is purely local: it knows nothing about parent containers or cached instances.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::definition::{ProviderDefinition, Scope};
use crate::error::{ContainerError, Result};
use crate::token::Token;

/// Representation handle shared by every container built on it
pub type SharedRepresentation = Arc<RwLock<ContainerRepresentation>>;

/// Maps each registered token to its definition, remembering registration order
#[derive(Clone, Default)]
pub struct ContainerRepresentation {
    providers: HashMap<Token, ProviderDefinition>,
    order: Vec<Token>,
}

impl ContainerRepresentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new provider.
    ///
    /// Return an error if the token is already registered
    pub fn register_provider(&mut self, definition: ProviderDefinition) -> Result<()> {
        definition.validate()?;
        if self.providers.contains_key(definition.token()) {
            return Err(ContainerError::DuplicateRegistration {
                token: definition.token().clone(),
            });
        }

        debug!(
            token = %definition.token(),
            scope = %definition.scope(),
            kind = definition.construction_method().kind(),
            "Provider registered"
        );
        self.order.push(definition.token().clone());
        self.providers.insert(definition.token().clone(), definition);
        Ok(())
    }

    /// Replace the definition of an existing provider, possibly moving it to another scope.
    ///
    /// Return an error if the token was never registered
    pub fn override_provider(&mut self, definition: ProviderDefinition) -> Result<()> {
        definition.validate()?;
        let Some(slot) = self.providers.get_mut(definition.token()) else {
            return Err(ContainerError::NotRegistered {
                token: definition.token().clone(),
            });
        };

        debug!(
            token = %definition.token(),
            previous_scope = %slot.scope(),
            scope = %definition.scope(),
            kind = definition.construction_method().kind(),
            "Provider overridden"
        );
        *slot = definition;
        Ok(())
    }

    pub fn lookup_provider_entry(&self, token: &Token) -> Option<&ProviderDefinition> {
        self.providers.get(token)
    }

    pub fn contains(&self, token: &Token) -> bool {
        self.providers.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Tokens currently in the given scope, in registration order
    pub fn tokens_in_scope(&self, scope: Scope) -> Vec<Token> {
        self.order
            .iter()
            .filter(|token| {
                self.providers
                    .get(*token)
                    .is_some_and(|definition| definition.scope() == scope)
            })
            .cloned()
            .collect()
    }

    pub fn into_shared(self) -> SharedRepresentation {
        Arc::new(RwLock::new(self))
    }
}
