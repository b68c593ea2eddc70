//! Construction methods and typed argument injection
//!
//! A provider is built by one of four closed kinds of [ConstructionMethod].
//! Factories and classes receive their dependencies as positional, typed arguments:
//! a factory is any function taking up to 8 `Arc<_>` parameters, and a class is a type
//! implementing [Injectable] with a tuple of `Arc<_>` as dependencies.
//!
//! The arguments are extracted from the resolved [Arguments] in ascending position order,
//! the same order in which they were declared on the provider definition.

use std::any::{type_name, Any};
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;

use crate::error::{BoxError, ContainerError, Result};
use crate::lifecycle::Lifecycle;
use crate::token::Token;

/// A resolved, type-erased instance
pub type Instance = Arc<dyn Any + Send + Sync>;

pub type FactoryFn = Arc<dyn Fn(Arguments) -> Result<Instance> + Send + Sync>;
pub type AsyncFactoryFn = Arc<dyn Fn(Arguments) -> BoxFuture<'static, Result<Instance>> + Send + Sync>;

/// How to produce the instance of a provider
#[derive(Clone)]
pub enum ConstructionMethod {
    /// Stored instance, returned as-is
    Value(Instance),
    /// Function invoked with the resolved dependencies
    Factory(FactoryFn),
    /// Function returning a future, only available through async resolution
    AsyncFactory(AsyncFactoryFn),
    /// Constructor of an [Injectable] type
    Class(ClassConstructor),
}

/// Erased constructor of an [Injectable] type
#[derive(Clone)]
pub struct ClassConstructor {
    type_name: &'static str,
    construct: FactoryFn,
}

impl ClassConstructor {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn construct(&self, arguments: Arguments) -> Result<Instance> {
        (self.construct)(arguments)
    }
}

impl ConstructionMethod {
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        ConstructionMethod::Value(Arc::new(value))
    }

    pub fn factory<F, Args, T>(factory: F) -> Self
    where
        F: Callable<Args, T> + Send + Sync + 'static,
        Args: FromArguments,
        T: Any + Send + Sync,
    {
        let factory: FactoryFn = Arc::new(move |arguments: Arguments| -> Result<Instance> {
            let args = Args::from_arguments(arguments)?;
            let instance: Instance = Arc::new(factory.call(args));
            Ok(instance)
        });
        ConstructionMethod::Factory(factory)
    }

    pub fn try_factory<F, Args, T, E>(factory: F) -> Self
    where
        F: Callable<Args, std::result::Result<T, E>> + Send + Sync + 'static,
        Args: FromArguments,
        T: Any + Send + Sync,
        E: Into<BoxError>,
    {
        let factory: FactoryFn = Arc::new(move |arguments: Arguments| -> Result<Instance> {
            let args = Args::from_arguments(arguments)?;
            let value = factory
                .call(args)
                .map_err(|e| ContainerError::Factory(e.into()))?;
            let instance: Instance = Arc::new(value);
            Ok(instance)
        });
        ConstructionMethod::Factory(factory)
    }

    pub fn async_factory<F, Args, Fut, T>(factory: F) -> Self
    where
        F: Callable<Args, Fut> + Send + Sync + 'static,
        Args: FromArguments,
        Fut: Future<Output = T> + Send + 'static,
        T: Any + Send + Sync,
    {
        let factory: AsyncFactoryFn = Arc::new(move |arguments: Arguments| -> BoxFuture<'static, Result<Instance>> {
            match Args::from_arguments(arguments) {
                Ok(args) => {
                    let pending = factory.call(args);
                    async move {
                        let instance: Instance = Arc::new(pending.await);
                        Ok::<_, ContainerError>(instance)
                    }
                    .boxed()
                }
                Err(e) => future::ready(Err(e)).boxed(),
            }
        });
        ConstructionMethod::AsyncFactory(factory)
    }

    pub fn try_async_factory<F, Args, Fut, T, E>(factory: F) -> Self
    where
        F: Callable<Args, Fut> + Send + Sync + 'static,
        Args: FromArguments,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        T: Any + Send + Sync,
        E: Into<BoxError>,
    {
        let factory: AsyncFactoryFn = Arc::new(move |arguments: Arguments| -> BoxFuture<'static, Result<Instance>> {
            match Args::from_arguments(arguments) {
                Ok(args) => {
                    let pending = factory.call(args);
                    async move {
                        let value = pending.await.map_err(|e| ContainerError::Factory(e.into()))?;
                        let instance: Instance = Arc::new(value);
                        Ok::<_, ContainerError>(instance)
                    }
                    .boxed()
                }
                Err(e) => future::ready(Err(e)).boxed(),
            }
        });
        ConstructionMethod::AsyncFactory(factory)
    }

    pub fn class<T: Injectable>() -> Self {
        let construct: FactoryFn = Arc::new(|arguments: Arguments| -> Result<Instance> {
            let dependencies = T::Dependencies::from_arguments(arguments)?;
            let instance: Instance = Arc::new(T::construct(dependencies));
            Ok(instance)
        });
        ConstructionMethod::Class(ClassConstructor {
            type_name: type_name::<T>(),
            construct,
        })
    }

    /// Short name of the construction kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ConstructionMethod::Value(_) => "value",
            ConstructionMethod::Factory(_) => "factory",
            ConstructionMethod::AsyncFactory(_) => "async factory",
            ConstructionMethod::Class(_) => "class",
        }
    }
}

/// A type that the container can instantiate with its positional dependencies.
///
/// ```
/// # use std::sync::Arc;
/// # use modivo::Injectable;
/// struct Repository {
///     url: Arc<String>,
/// }
///
/// impl Injectable for Repository {
///     type Dependencies = (Arc<String>,);
///
///     fn construct((url,): Self::Dependencies) -> Self {
///         Repository { url }
///     }
/// }
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
    type Dependencies: FromArguments;

    fn construct(dependencies: Self::Dependencies) -> Self;

    /// Hooks exposed by the constructed instances
    fn lifecycle() -> Lifecycle<Self> {
        Lifecycle::new()
    }
}

/// Resolved dependencies of a provider, in ascending position order
pub struct Arguments {
    values: Vec<(Token, Instance)>,
    cursor: usize,
}

impl Arguments {
    pub(crate) fn new(values: Vec<(Token, Instance)>) -> Self {
        Self { values, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fail unless exactly `expected` arguments were resolved
    pub fn expect_len(&self, expected: usize) -> Result<()> {
        if self.values.len() != expected {
            return Err(ContainerError::ArgumentCount {
                expected,
                found: self.values.len(),
            });
        }
        Ok(())
    }

    /// Take the next positional argument as a `T`
    pub fn next<T: Any + Send + Sync>(&mut self) -> Result<Arc<T>> {
        let (token, instance) =
            self.values
                .get(self.cursor)
                .cloned()
                .ok_or(ContainerError::ArgumentCount {
                    expected: self.cursor + 1,
                    found: self.values.len(),
                })?;
        self.cursor += 1;
        downcast_instance(&token, instance)
    }
}

pub(crate) fn downcast_instance<T: Any + Send + Sync>(token: &Token, instance: Instance) -> Result<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| ContainerError::TypeMismatch {
            token: token.clone(),
            expected: type_name::<T>(),
        })
}

/// Build a typed argument list from the resolved dependencies
///
/// This trait is implemented for tuples of up to 8 `Arc<_>`
pub trait FromArguments: Sized {
    fn from_arguments(arguments: Arguments) -> Result<Self>;
}

/// A Callable has a ```call``` function with a single argument and a single return type.
///
/// This trait is implemented for all functions with up to 8 arguments, using a tuple to
/// wrap them all in a single type.
pub trait Callable<Args, Ret> {
    fn call(&self, args: Args) -> Ret;
}

macro_rules! callable_tuple ({ $($param:ident)* } => {
    impl<Func, Ret, $($param,)*> Callable<($(Arc<$param>,)*), Ret> for Func
    where
        Func: Fn($(Arc<$param>),*) -> Ret,
    {
        #[inline]
        #[allow(non_snake_case)]
        fn call(&self, ($($param,)*): ($(Arc<$param>,)*)) -> Ret {
            (self)($($param,)*)
        }
    }

    // Extract such tuples from the positional arguments
    #[allow(clippy::unused_unit)]
    impl<$($param: Any + Send + Sync,)*> FromArguments for ($(Arc<$param>,)*) {
        #[inline]
        #[allow(unused_mut)]
        fn from_arguments(mut arguments: Arguments) -> Result<Self> {
            arguments.expect_len(<[&str]>::len(&[$(stringify!($param)),*]))?;
            Ok(($(arguments.next::<$param>()?,)*))
        }
    }
});

callable_tuple! {}
callable_tuple! { A }
callable_tuple! { A B }
callable_tuple! { A B C }
callable_tuple! { A B C D }
callable_tuple! { A B C D E }
callable_tuple! { A B C D E F }
callable_tuple! { A B C D E F G }
callable_tuple! { A B C D E F G H }
