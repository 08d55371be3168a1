use std::sync::Arc;

use thiserror::Error;

use crate::types::{Alias, DynError};

/// Errors when trying to register a handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// The alias already has a handler, forget it first
    #[error("'{0}' has already been registered")]
    Duplicate(Alias),

    #[error("Cannot register a handler under an empty alias")]
    EmptyAlias,
}

/// Errors when trying to make an instance
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// The introspector does not know the alias
    #[error("'{0}' is not a known type")]
    TypeNotFound(Alias),

    /// A constructor argument could not be supplied
    #[error("Parameter {position} of '{alias}' could not be resolved: {reason}")]
    UnresolvableParameter {
        alias: Alias,
        position: usize,
        reason: String,
    },

    /// The alias is already being resolved further up the chain
    #[error("Circular dependency on '{alias}' through {chain:?}")]
    CyclicDependency { alias: Alias, chain: Vec<Alias> },

    /// The resolution chain grew deeper than allowed
    #[error("Resolving '{alias}' exceeded the maximum depth of {depth}")]
    DepthExceeded { alias: Alias, depth: usize },

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },

    /// The constructor of an auto-wired type failed
    #[error("Constructing '{alias}' failed - error: {error}")]
    ConstructionFailed { alias: Alias, error: Arc<DynError> },

    /// A manually registered handler failed
    #[error("Handler for '{alias}' failed - error: {error}")]
    HandlerFailed { alias: Alias, error: Arc<DynError> },
}

impl ResolveError {
    /// Wraps a foreign constructor failure
    pub fn construction(alias: impl Into<Alias>, error: impl Into<DynError>) -> Self {
        ResolveError::ConstructionFailed {
            alias: alias.into(),
            error: Arc::new(error.into()),
        }
    }
}
