//! Resolution across a chain of containers
//!
//! The current container always wins: its parents are only asked for a token it does not register.
//! Whether a container holds the token is decided from its registry, never from the resolved value.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, trace};

use crate::construction::Instance;
use crate::container::Container;
use crate::error::{ContainerError, Result};
use crate::token::Token;

pub(crate) struct HierarchyResolver<'a> {
    container: &'a Container,
}

impl<'a> HierarchyResolver<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn resolve_provider(&self, token: &Token) -> Result<Instance> {
        let mut current = Some(self.container);
        while let Some(container) = current {
            if let Some(instance) = container.try_resolve_local(token)? {
                return Ok(instance);
            }
            trace!(container = %container.label(), token = %token, "Provider not registered here, trying parent");
            current = container.parent();
        }
        Err(ContainerError::ProviderNotFound {
            token: token.clone(),
        })
    }

    pub fn resolve_provider_async(self, token: Token) -> BoxFuture<'a, Result<Instance>> {
        async move {
            let mut current = Some(self.container);
            while let Some(container) = current {
                if let Some(instance) = container.try_resolve_local_async(token.clone()).await? {
                    return Ok(instance);
                }
                trace!(container = %container.label(), token = %token, "Provider not registered here, trying parent");
                current = container.parent();
            }
            Err(ContainerError::ProviderNotFound { token })
        }
        .boxed()
    }

    /// Resolve every provider of this container, then of each child, top-down
    pub fn resolve_container(&self) -> Result<()> {
        self.container.resolve_everything_local()?;
        for child in self.container.child_containers() {
            HierarchyResolver::new(&child).resolve_container()?;
        }
        debug!(container = %self.container.label(), "Container hierarchy resolved");
        Ok(())
    }

    pub fn resolve_container_async(self) -> BoxFuture<'a, Result<()>> {
        async move {
            self.container.resolve_everything_local_async().await?;
            for child in self.container.child_containers() {
                HierarchyResolver::new(&child).resolve_container_async().await?;
            }
            debug!(container = %self.container.label(), "Container hierarchy resolved");
            Ok(())
        }
        .boxed()
    }
}
