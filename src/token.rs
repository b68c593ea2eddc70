//! Provider identifiers
//!
//! A [Token] is the key under which a provider is registered. It wraps one of three identity kinds:
//!
//! * a string, equal to any other string token with the same content,
//! * a [Symbol], unique per creation even when two symbols share a description,
//! * a [TypeKey], identifying a Rust type (the "class reference" kind).

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::container::Container;
use crate::error::Result;

/// Opaque, equality-comparable key identifying a registration.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Token {
    String(Arc<str>),
    Symbol(Symbol),
    Type(TypeKey),
}

impl Token {
    /// Token identifying the type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Token::Type(TypeKey::of::<T>())
    }

    /// Create a fresh symbol token, distinct from every other token.
    pub fn symbol(description: &str) -> Self {
        Token::Symbol(Symbol::new(description))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Symbol(s) => write!(f, "{}", s),
            Token::Type(t) => write!(f, "{}", t.name),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({})", self)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::String(Arc::from(value))
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::String(Arc::from(value))
    }
}

impl From<Symbol> for Token {
    fn from(value: Symbol) -> Self {
        Token::Symbol(value)
    }
}

impl From<TypeKey> for Token {
    fn from(value: TypeKey) -> Self {
        Token::Type(value)
    }
}

impl From<&Token> for Token {
    fn from(value: &Token) -> Self {
        value.clone()
    }
}

impl<T> From<&Ticket<T>> for Token {
    fn from(value: &Ticket<T>) -> Self {
        value.token.clone()
    }
}

/// Build a token from a string, a symbol or a type key.
///
/// The kind of token follows the kind of the value.
pub fn create_identifier(value: impl Into<Token>) -> Token {
    value.into()
}

/// Unique identifier with a human readable description.
///
/// Two symbols are equal only if one is a clone of the other.
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Arc<str>,
}

impl Symbol {
    pub fn new(description: &str) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self {
            id: COUNTER.fetch_add(1, Ordering::Relaxed),
            description: Arc::from(description),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})#{}", self.description, self.id)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Identity of a Rust type, keeping its name for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

/// Anything that can be used in place of a raw [Token] when resolving.
pub trait AsToken {
    fn as_token(&self) -> &Token;
}

impl AsToken for Token {
    fn as_token(&self) -> &Token {
        self
    }
}

impl<K: AsToken + ?Sized> AsToken for &K {
    fn as_token(&self) -> &Token {
        (**self).as_token()
    }
}

/// A token tagged with the type of the instance it resolves to.
pub struct Ticket<T> {
    token: Token,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Ticket<T> {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Ticket<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticket<{}>({})", type_name::<T>(), self.token)
    }
}

impl<T: Any + Send + Sync> Ticket<T> {
    pub fn new(identifier: impl Into<Token>) -> Self {
        Self {
            token: identifier.into(),
            _marker: PhantomData,
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Resolve through the container hierarchy and downcast the instance.
    pub fn resolve(&self, container: &Container) -> Result<Arc<T>> {
        container.resolve::<T, _>(self)
    }

    pub async fn resolve_async(&self, container: &Container) -> Result<Arc<T>> {
        container.resolve_async::<T, _>(self).await
    }
}

impl<T> AsToken for Ticket<T> {
    fn as_token(&self) -> &Token {
        &self.token
    }
}
