//! Container facade: instance cache, parent link and resolution entry points.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use futures::executor::block_on;
use futures::future::BoxFuture;
use futures::FutureExt;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::builder::ContainerBuilder;
use crate::config::ContainerOptions;
use crate::construction::{downcast_instance, Instance};
use crate::definition::{ProviderDefinition, Scope};
use crate::error::{ContainerError, Result};
use crate::hierarchy::HierarchyResolver;
use crate::representation::{ContainerRepresentation, SharedRepresentation};
use crate::resolver::ContainerResolver;
use crate::token::{AsToken, Token};

/// Cache entry of a singleton provider.
///
/// The cell is filled at most once. Sync and async first accesses both build under the gate,
/// the sync path blocking on it.
#[derive(Default)]
struct SingletonSlot {
    cell: OnceCell<Instance>,
    gate: tokio::sync::Mutex<()>,
}

struct ContainerInner {
    representation: SharedRepresentation,
    parent: Option<Container>,
    singletons: Mutex<HashMap<Token, Arc<SingletonSlot>>>,
    children: Mutex<Vec<Weak<ContainerInner>>>,
    options: ContainerOptions,
}

/// Dependency injection container.
///
/// Cloning a container gives another handle on the same registry, cache and hierarchy.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    pub fn new(representation: ContainerRepresentation, parent: Option<&Container>) -> Self {
        Self::with_options(representation.into_shared(), parent, ContainerOptions::default())
    }

    /// Build a container on a representation that other containers may share
    pub fn from_shared(representation: SharedRepresentation, parent: Option<&Container>) -> Self {
        Self::with_options(representation, parent, ContainerOptions::default())
    }

    pub fn with_options(
        representation: SharedRepresentation,
        parent: Option<&Container>,
        options: ContainerOptions,
    ) -> Self {
        let inner = Arc::new(ContainerInner {
            representation,
            parent: parent.cloned(),
            singletons: Mutex::default(),
            children: Mutex::default(),
            options,
        });
        let container = Self { inner };

        match parent {
            Some(parent) => {
                let mut children = parent.inner.children.lock();
                children.retain(|child| child.strong_count() > 0);
                children.push(Arc::downgrade(&container.inner));
                drop(children);
                debug!(container = %container.label(), parent = %parent.label(), "Child container created");
            }
            None => debug!(container = %container.label(), "Root container created"),
        }
        container
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub fn label(&self) -> &str {
        self.inner.options.label_or_default()
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    pub fn parent(&self) -> Option<&Container> {
        self.inner.parent.as_ref()
    }

    /// Children created with this container as parent and still alive
    pub fn child_containers(&self) -> Vec<Container> {
        self.inner
            .children
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .map(|inner| Container { inner })
            .collect()
    }

    pub fn representation(&self) -> SharedRepresentation {
        self.inner.representation.clone()
    }

    pub fn register_provider(&self, definition: ProviderDefinition) -> Result<()> {
        self.inner.representation.write().register_provider(definition)
    }

    /// Replace a local definition. Instances already cached by a container are kept.
    pub fn override_provider(&self, definition: ProviderDefinition) -> Result<()> {
        self.inner.representation.write().override_provider(definition)
    }

    pub fn lookup_provider_entry<K: AsToken + ?Sized>(&self, key: &K) -> Option<ProviderDefinition> {
        self.local_definition(key.as_token())
    }

    /// Resolve from this container, or from the closest ancestor registering the token.
    ///
    /// The first resolution of a singleton blocks while another resolution of it is in flight,
    /// including an async one.
    pub fn resolve_provider<K: AsToken + ?Sized>(&self, key: &K) -> Result<Instance> {
        HierarchyResolver::new(self).resolve_provider(key.as_token())
    }

    /// Resolve from this container only
    pub fn resolve_local_provider<K: AsToken + ?Sized>(&self, key: &K) -> Result<Instance> {
        let token = key.as_token();
        self.try_resolve_local(token)?
            .ok_or_else(|| ContainerError::ProviderNotFound {
                token: token.clone(),
            })
    }

    pub fn resolve_async_provider<K: AsToken + ?Sized>(&self, key: &K) -> BoxFuture<'_, Result<Instance>> {
        HierarchyResolver::new(self).resolve_provider_async(key.as_token().clone())
    }

    pub fn resolve_async_local_provider<K: AsToken + ?Sized>(&self, key: &K) -> BoxFuture<'_, Result<Instance>> {
        let token = key.as_token().clone();
        async move {
            self.try_resolve_local_async(token.clone())
                .await?
                .ok_or(ContainerError::ProviderNotFound { token })
        }
        .boxed()
    }

    /// Resolve through the hierarchy and downcast to `T`
    pub fn resolve<T, K>(&self, key: &K) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
        K: AsToken + ?Sized,
    {
        let instance = self.resolve_provider(key)?;
        downcast_instance(key.as_token(), instance)
    }

    pub async fn resolve_async<T, K>(&self, key: &K) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
        K: AsToken + Sync + ?Sized,
    {
        let instance = self.resolve_async_provider(key).await?;
        downcast_instance(key.as_token(), instance)
    }

    /// Resolve every provider of this container and of all its children, top-down.
    ///
    /// Fails on async factories and async hooks; use [Container::resolve_everything_async] for those.
    pub fn resolve_everything(&self) -> Result<()> {
        HierarchyResolver::new(self).resolve_container()
    }

    pub fn resolve_everything_async(&self) -> BoxFuture<'_, Result<()>> {
        HierarchyResolver::new(self).resolve_container_async()
    }

    /// Resolve every local provider, singletons first, so that their hooks run now
    pub fn resolve_everything_local(&self) -> Result<()> {
        for token in self.eager_tokens() {
            self.resolve_local_provider(&token)?;
        }
        Ok(())
    }

    pub async fn resolve_everything_local_async(&self) -> Result<()> {
        for token in self.eager_tokens() {
            self.resolve_async_local_provider(&token).await?;
        }
        Ok(())
    }

    pub fn destroy(&self) -> Result<()> {
        Err(ContainerError::NotImplemented("destroy"))
    }

    pub async fn destroy_async(&self) -> Result<()> {
        Err(ContainerError::NotImplemented("destroy_async"))
    }

    pub fn destroy_local(&self) -> Result<()> {
        Err(ContainerError::NotImplemented("destroy_local"))
    }

    pub async fn destroy_local_async(&self) -> Result<()> {
        Err(ContainerError::NotImplemented("destroy_local_async"))
    }

    /// Resolve a locally registered token, `None` when it is not registered here
    pub(crate) fn try_resolve_local(&self, token: &Token) -> Result<Option<Instance>> {
        let Some(definition) = self.local_definition(token) else {
            return Ok(None);
        };
        let resolver = ContainerResolver::new(self);

        let instance = match definition.scope() {
            Scope::Singleton => {
                let slot = self.singleton_slot(token);
                if let Some(instance) = slot.cell.get() {
                    trace!(container = %self.label(), token = %token, "Singleton cache hit");
                    return Ok(Some(instance.clone()));
                }

                let _gate = block_on(slot.gate.lock());
                if let Some(instance) = slot.cell.get() {
                    return Ok(Some(instance.clone()));
                }
                let built = resolver.construct(&definition)?;
                slot.cell.get_or_init(|| built).clone()
            }
            Scope::Transient => resolver.construct(&definition)?,
        };
        Ok(Some(instance))
    }

    pub(crate) fn try_resolve_local_async(&self, token: Token) -> BoxFuture<'_, Result<Option<Instance>>> {
        async move {
            let Some(definition) = self.local_definition(&token) else {
                return Ok(None);
            };
            let resolver = ContainerResolver::new(self);

            let instance = match definition.scope() {
                Scope::Singleton => {
                    let slot = self.singleton_slot(&token);
                    if let Some(instance) = slot.cell.get() {
                        trace!(container = %self.label(), token = %token, "Singleton cache hit");
                        return Ok(Some(instance.clone()));
                    }

                    let _gate = slot.gate.lock().await;
                    if let Some(instance) = slot.cell.get() {
                        return Ok(Some(instance.clone()));
                    }
                    let built = resolver.construct_async(definition).await?;
                    slot.cell.get_or_init(|| built).clone()
                }
                Scope::Transient => resolver.construct_async(definition).await?,
            };
            Ok(Some(instance))
        }
        .boxed()
    }

    fn local_definition(&self, token: &Token) -> Option<ProviderDefinition> {
        self.inner
            .representation
            .read()
            .lookup_provider_entry(token)
            .cloned()
    }

    fn singleton_slot(&self, token: &Token) -> Arc<SingletonSlot> {
        self.inner
            .singletons
            .lock()
            .entry(token.clone())
            .or_default()
            .clone()
    }

    fn eager_tokens(&self) -> Vec<Token> {
        let representation = self.inner.representation.read();
        let mut tokens = representation.tokens_in_scope(Scope::Singleton);
        if self.inner.options.eager_transients {
            tokens.extend(representation.tokens_in_scope(Scope::Transient));
        }
        tokens
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("label", &self.label())
            .field("providers", &self.inner.representation.read().len())
            .field("parent", &self.parent().map(Container::label))
            .finish()
    }
}
