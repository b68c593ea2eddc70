//! Construction dispatch for a single container
//!
//! The resolver builds one instance from a definition found in its container, after resolving the
//! positional dependencies through that same container (which walks up to its parents if needed).
//! It then runs the on-resolved hook of the new instance. Caching is left to the container.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, trace};

use crate::construction::{Arguments, ConstructionMethod, Instance};
use crate::container::Container;
use crate::definition::ProviderDefinition;
use crate::error::{ContainerError, Result};
use crate::lifecycle::ResolvedHook;

#[derive(Clone, Copy)]
pub(crate) struct ContainerResolver<'a> {
    container: &'a Container,
}

impl<'a> ContainerResolver<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn construct(&self, definition: &ProviderDefinition) -> Result<Instance> {
        let token = definition.token();
        debug!(
            container = %self.container.label(),
            token = %token,
            scope = %definition.scope(),
            kind = definition.construction_method().kind(),
            "Constructing provider"
        );

        let instance = match definition.construction_method() {
            ConstructionMethod::Value(value) => value.clone(),
            ConstructionMethod::Factory(factory) => factory(self.resolve_arguments(definition)?)?,
            ConstructionMethod::Class(class) => class.construct(self.resolve_arguments(definition)?)?,
            ConstructionMethod::AsyncFactory(_) => {
                return Err(ContainerError::AsyncNotSupportedInSyncMode {
                    token: token.clone(),
                })
            }
        };

        match definition.lifecycle().select(token)? {
            ResolvedHook::None => {}
            ResolvedHook::Sync(hook) => {
                trace!(token = %token, "Running on-resolved sync hook");
                hook(token, &instance)?;
            }
            ResolvedHook::Async(_) => {
                return Err(ContainerError::AsyncHookInSyncMode {
                    token: token.clone(),
                })
            }
        }
        Ok(instance)
    }

    pub fn construct_async(self, definition: ProviderDefinition) -> BoxFuture<'a, Result<Instance>> {
        async move {
            let token = definition.token();
            debug!(
                container = %self.container.label(),
                token = %token,
                scope = %definition.scope(),
                kind = definition.construction_method().kind(),
                "Constructing provider asynchronously"
            );

            let instance = match definition.construction_method() {
                ConstructionMethod::Value(value) => value.clone(),
                ConstructionMethod::Factory(factory) => {
                    factory(self.resolve_arguments_async(&definition).await?)?
                }
                ConstructionMethod::Class(class) => {
                    class.construct(self.resolve_arguments_async(&definition).await?)?
                }
                ConstructionMethod::AsyncFactory(factory) => {
                    factory(self.resolve_arguments_async(&definition).await?).await?
                }
            };

            match definition.lifecycle().select(token)? {
                ResolvedHook::None => {}
                ResolvedHook::Sync(hook) => {
                    trace!(token = %token, "Running on-resolved sync hook");
                    hook(token, &instance)?;
                }
                ResolvedHook::Async(hook) => {
                    trace!(token = %token, "Awaiting on-resolved async hook");
                    hook(token, instance.clone())?.await;
                }
            }
            Ok(instance)
        }
        .boxed()
    }

    /// Resolve the dependencies one after the other, in ascending position order
    fn resolve_arguments(&self, definition: &ProviderDefinition) -> Result<Arguments> {
        let mut values = Vec::with_capacity(definition.dependencies().len());
        for dependency in definition.dependencies() {
            let instance = self
                .container
                .resolve_provider(&dependency.token)
                .map_err(|source| ContainerError::Dependency {
                    token: definition.token().clone(),
                    position: dependency.index,
                    source: Box::new(source),
                })?;
            values.push((dependency.token.clone(), instance));
        }
        Ok(Arguments::new(values))
    }

    async fn resolve_arguments_async(&self, definition: &ProviderDefinition) -> Result<Arguments> {
        let mut values = Vec::with_capacity(definition.dependencies().len());
        for dependency in definition.dependencies() {
            let instance = self
                .container
                .resolve_async_provider(&dependency.token)
                .await
                .map_err(|source| ContainerError::Dependency {
                    token: definition.token().clone(),
                    position: dependency.index,
                    source: Box::new(source),
                })?;
            values.push((dependency.token.clone(), instance));
        }
        Ok(Arguments::new(values))
    }
}
