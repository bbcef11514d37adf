//! Resource scope identifiers
//!
//! A [`ScopeId`] says *where* a listing happens: a subscription, a resource
//! group, or a resource nested below a provider namespace. IDs are built
//! against a [`ScopeShape`] so that every segment the shape requires is
//! present and non-empty; a half-formed ID cannot be constructed.
//!
//! [`ScopePath`] turns a scope into the request path of a collection.

mod id;
mod path;
mod shape;

pub use id::{IdError, ScopeId};
pub use path::{ProviderCollection, ScopePath};
pub use shape::{
    ScopeShape, SegmentSpec, KNOWN_SHAPES, RECOVERABLE_DATABASE, RESOURCE_GROUP, SUBSCRIPTION,
    WORKSPACE,
};

#[cfg(test)]
mod tests;
