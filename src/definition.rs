//! Provider definitions: what to build, how, and with which dependencies.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::construction::{Callable, ConstructionMethod, FromArguments, Injectable};
use crate::error::{BoxError, ContainerError, Result};
use crate::lifecycle::{Lifecycle, LifecycleHooks};
use crate::token::Token;

/// Lifetime of the instances built for a provider
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// One instance per container, built on first resolution
    #[default]
    Singleton,
    /// A new instance for every resolution
    Transient,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => f.write_str("singleton"),
            Scope::Transient => f.write_str("transient"),
        }
    }
}

impl FromStr for Scope {
    type Err = ContainerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "singleton" => Ok(Scope::Singleton),
            "transient" => Ok(Scope::Transient),
            _ => Err(ContainerError::InvalidScope(s.to_string())),
        }
    }
}

/// A dependency bound to a parameter position of the factory or constructor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub index: usize,
    pub token: Token,
}

/// Binds a token to a construction method, a scope and its ordered dependencies
#[derive(Clone)]
pub struct ProviderDefinition {
    token: Token,
    construction_method: ConstructionMethod,
    scope: Scope,
    dependencies: Vec<DependencyRef>,
    lifecycle: LifecycleHooks,
}

impl ProviderDefinition {
    pub fn new(token: impl Into<Token>, construction_method: ConstructionMethod) -> Self {
        Self {
            token: token.into(),
            construction_method,
            scope: Scope::default(),
            dependencies: Vec::new(),
            lifecycle: LifecycleHooks::default(),
        }
    }

    pub fn value<T: Any + Send + Sync>(token: impl Into<Token>, value: T) -> Self {
        Self::new(token, ConstructionMethod::value(value))
    }

    pub fn factory<F, Args, T>(token: impl Into<Token>, factory: F) -> Self
    where
        F: Callable<Args, T> + Send + Sync + 'static,
        Args: FromArguments,
        T: Any + Send + Sync,
    {
        Self::new(token, ConstructionMethod::factory(factory))
    }

    pub fn try_factory<F, Args, T, E>(token: impl Into<Token>, factory: F) -> Self
    where
        F: Callable<Args, std::result::Result<T, E>> + Send + Sync + 'static,
        Args: FromArguments,
        T: Any + Send + Sync,
        E: Into<BoxError>,
    {
        Self::new(token, ConstructionMethod::try_factory(factory))
    }

    pub fn async_factory<F, Args, Fut, T>(token: impl Into<Token>, factory: F) -> Self
    where
        F: Callable<Args, Fut> + Send + Sync + 'static,
        Args: FromArguments,
        Fut: std::future::Future<Output = T> + Send + 'static,
        T: Any + Send + Sync,
    {
        Self::new(token, ConstructionMethod::async_factory(factory))
    }

    /// Definition of an [Injectable] type, carrying the hooks its type declares
    pub fn class<T: Injectable>(token: impl Into<Token>) -> Self {
        let mut definition = Self::new(token, ConstructionMethod::class::<T>());
        definition.lifecycle = T::lifecycle().into_hooks();
        definition
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Replace the dependencies, assigning positions in iteration order
    pub fn with_dependencies<I>(mut self, tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Token>,
    {
        self.dependencies = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| DependencyRef {
                index,
                token: token.into(),
            })
            .collect();
        self
    }

    /// Bind a dependency to an explicit parameter position
    pub fn with_dependency_at(mut self, index: usize, token: impl Into<Token>) -> Self {
        self.dependencies.retain(|d| d.index != index);
        self.dependencies.push(DependencyRef {
            index,
            token: token.into(),
        });
        self.dependencies.sort_by_key(|d| d.index);
        self
    }

    /// Declare the hooks of the instances built by a value or factory provider
    pub fn with_lifecycle<T: Any + Send + Sync>(mut self, lifecycle: Lifecycle<T>) -> Self {
        self.lifecycle = lifecycle.into_hooks();
        self
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn construction_method(&self) -> &ConstructionMethod {
        &self.construction_method
    }

    /// Dependencies in ascending position order
    pub fn dependencies(&self) -> &[DependencyRef] {
        &self.dependencies
    }

    pub fn lifecycle(&self) -> &LifecycleHooks {
        &self.lifecycle
    }

    /// Positions must cover `0..n` without gaps so that arguments line up with parameters.
    pub(crate) fn validate(&self) -> Result<()> {
        for (expected, dependency) in self.dependencies.iter().enumerate() {
            if dependency.index != expected {
                return Err(ContainerError::DependencyIndexGap {
                    token: self.token.clone(),
                    expected,
                    found: dependency.index,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDefinition")
            .field("token", &self.token)
            .field("kind", &self.construction_method.kind())
            .field("scope", &self.scope)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}
