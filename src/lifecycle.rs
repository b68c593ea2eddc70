//! Post-construction hooks
//!
//! An instance may expose one of two capabilities, called once for every instance the container builds:
//!
//! * [OnResolvedSync], invoked before the instance is returned,
//! * [OnResolvedAsync], awaited before the instance is returned by the async resolution path.
//!
//! Rust has no runtime reflection on trait implementations, so the capabilities of a type are declared
//! with a [Lifecycle] when the provider is defined. Declaring both is accepted at registration time,
//! but resolving such a provider fails.

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::construction::{downcast_instance, Instance};
use crate::error::{ContainerError, Result};
use crate::token::Token;

/// Hook invoked synchronously after an instance has been built
pub trait OnResolvedSync: Send + Sync {
    fn after_resolved_sync(&self);
}

/// Hook awaited after an instance has been built
pub trait OnResolvedAsync: Send + Sync {
    fn after_resolved_async(&self) -> BoxFuture<'_, ()>;
}

pub type SyncHook = Arc<dyn Fn(&Token, &Instance) -> Result<()> + Send + Sync>;
pub type AsyncHook = Arc<dyn Fn(&Token, Instance) -> Result<BoxFuture<'static, ()>> + Send + Sync>;

/// Type-erased hooks attached to a provider definition
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    on_resolved_sync: Option<SyncHook>,
    on_resolved_async: Option<AsyncHook>,
}

/// The single hook selected for an instance
pub(crate) enum ResolvedHook<'a> {
    None,
    Sync(&'a SyncHook),
    Async(&'a AsyncHook),
}

impl LifecycleHooks {
    pub fn is_empty(&self) -> bool {
        self.on_resolved_sync.is_none() && self.on_resolved_async.is_none()
    }

    pub(crate) fn select(&self, token: &Token) -> Result<ResolvedHook<'_>> {
        match (&self.on_resolved_sync, &self.on_resolved_async) {
            (Some(_), Some(_)) => Err(ContainerError::AmbiguousLifecycleHook {
                token: token.clone(),
            }),
            (Some(hook), None) => Ok(ResolvedHook::Sync(hook)),
            (None, Some(hook)) => Ok(ResolvedHook::Async(hook)),
            (None, None) => Ok(ResolvedHook::None),
        }
    }
}

/// Typed declaration of the hooks exposed by instances of `T`
pub struct Lifecycle<T> {
    hooks: LifecycleHooks,
    _marker: PhantomData<fn(T)>,
}

impl<T: Any + Send + Sync> Default for Lifecycle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any + Send + Sync> Lifecycle<T> {
    /// No hook
    pub fn new() -> Self {
        Self {
            hooks: LifecycleHooks::default(),
            _marker: PhantomData,
        }
    }

    pub fn on_resolved_sync(mut self) -> Self
    where
        T: OnResolvedSync,
    {
        let hook: SyncHook = Arc::new(|token: &Token, instance: &Instance| -> Result<()> {
            let typed = instance
                .downcast_ref::<T>()
                .ok_or_else(|| ContainerError::TypeMismatch {
                    token: token.clone(),
                    expected: std::any::type_name::<T>(),
                })?;
            typed.after_resolved_sync();
            Ok(())
        });
        self.hooks.on_resolved_sync = Some(hook);
        self
    }

    pub fn on_resolved_async(mut self) -> Self
    where
        T: OnResolvedAsync,
    {
        let hook: AsyncHook = Arc::new(|token: &Token, instance: Instance| -> Result<BoxFuture<'static, ()>> {
            let typed = downcast_instance::<T>(token, instance)?;
            Ok(async move { typed.after_resolved_async().await }.boxed())
        });
        self.hooks.on_resolved_async = Some(hook);
        self
    }

    pub(crate) fn into_hooks(self) -> LifecycleHooks {
        self.hooks
    }
}
