//! Runtime dependency injection container with scopes, hierarchies and lifecycle hooks.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use modivo::*;
//! struct Config {
//!     greeting: String,
//! }
//!
//! struct Greeter {
//!     config: Arc<Config>,
//! }
//!
//! # fn main() -> Result<(), ContainerError> {
//! let config = Ticket::<Config>::new("config");
//! let greeter = Ticket::<Greeter>::new("greeter");
//!
//! // Register the providers, then build a container
//! let container = Container::builder()
//!     .register(ProviderDefinition::value(config.token(), Config { greeting: "Hello".into() }))?
//!     .register(
//!         ProviderDefinition::factory(greeter.token(), |config: Arc<Config>| Greeter { config })
//!             .with_dependencies([config.token()]),
//!     )?
//!     .build();
//!
//! let g1 = greeter.resolve(&container)?;
//! let g2 = greeter.resolve(&container)?;
//! assert_eq!(g1.config.greeting, "Hello");
//! assert!(Arc::ptr_eq(&g1, &g2));
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! Providers are identified by a [Token] and stored as type-erased [ProviderDefinition]s in the
//! [ContainerRepresentation] of a container. Resolving a token works as follows:
//!
//! * The container looks the token up in its own representation. If it is not registered there,
//!   the same lookup is done in the parent container, and so on up to the root.
//! * The container owning the definition resolves its dependencies (in position order), then calls
//!   the value, factory, async factory or class constructor of the definition.
//! * The on-resolved hook declared with a [Lifecycle] is invoked on the new instance.
//! * [Scope::Singleton] instances are cached by the owning container, [Scope::Transient] ones never are.
//!
//! Factories are plain functions taking `Arc<_>` arguments: the [Callable] and [FromArguments] traits
//! extract and downcast the positional arguments, for up to 8 parameters.
//!
//! Async factories and async hooks are only available through the async resolution methods.

mod builder;
mod config;
mod construction;
mod container;
mod definition;
mod error;
mod hierarchy;
mod lifecycle;
mod representation;
mod resolver;
mod token;

pub use builder::ContainerBuilder;
pub use config::ContainerOptions;
pub use construction::{
    Arguments, AsyncFactoryFn, Callable, ClassConstructor, ConstructionMethod, FactoryFn, FromArguments, Injectable,
    Instance,
};
pub use container::Container;
pub use definition::{DependencyRef, ProviderDefinition, Scope};
pub use error::{BoxError, ContainerError, Result};
pub use lifecycle::{AsyncHook, Lifecycle, LifecycleHooks, OnResolvedAsync, OnResolvedSync, SyncHook};
pub use representation::{ContainerRepresentation, SharedRepresentation};
pub use token::{create_identifier, AsToken, Symbol, Ticket, Token, TypeKey};
