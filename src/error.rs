use thiserror::Error;

use crate::token::Token;

/// Boxed error returned by fallible factories
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = ContainerError> = std::result::Result<T, E>;

/// Errors triggered while registering or resolving providers
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Provider {token} is already registered")]
    DuplicateRegistration { token: Token },

    #[error("Provider {token} is not registered yet, register it before overriding it")]
    NotRegistered { token: Token },

    #[error("Provider {token} not found")]
    ProviderNotFound { token: Token },

    #[error("Invalid provider scope `{0}`")]
    InvalidScope(String),

    #[error("Provider {token} uses an async factory, which is not supported in sync mode")]
    AsyncNotSupportedInSyncMode { token: Token },

    #[error("Provider {token}: provider on resolved and provider on resolved sync are both implemented. Only one should be implemented.")]
    AmbiguousLifecycleHook { token: Token },

    #[error("Provider {token} has an async on-resolved hook and must be resolved asynchronously")]
    AsyncHookInSyncMode { token: Token },

    #[error("Provider {token} declares a dependency at position {found}, expected position {expected}")]
    DependencyIndexGap {
        token: Token,
        expected: usize,
        found: usize,
    },

    #[error("Expected {expected} resolved arguments, got {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("Instance resolved for {token} is not a `{expected}`")]
    TypeMismatch { token: Token, expected: &'static str },

    #[error("Failed to resolve dependency #{position} of provider {token}")]
    Dependency {
        token: Token,
        position: usize,
        #[source]
        source: Box<ContainerError>,
    },

    #[error("Provider factory failed: {0}")]
    Factory(#[source] BoxError),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl ContainerError {
    /// Follow nested dependency failures down to the error that started the chain.
    pub fn root_cause(&self) -> &ContainerError {
        let mut current = self;
        while let ContainerError::Dependency { source, .. } = current {
            current = source;
        }
        current
    }
}
