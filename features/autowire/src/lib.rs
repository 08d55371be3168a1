//! Autowire is an auto-wiring dependency container.
//!
//! Ask it for a type and it hands back a fully constructed instance,
//! building every constructor dependency on the way.
//!
//! Autowire consists of the following parts:
//!
//! 1. [Container]: the registry of handlers and the resolution entry point
//! 2. [TypeCatalog]: what the container knows about constructible types,
//!    filled from [Autowire] and [Singleton] implementations
//! 3. The auto-wiring engine: builds and memoizes anything without a handler
//! 4. [locator]: optional process-wide access to one container
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use autowire::{Autowire, Container, HandlerKind, TypeCatalog};
//!
//! #[derive(Autowire)]
//! struct Database;
//!
//! #[derive(Autowire)]
//! struct UserService {
//!     db: Arc<Database>,
//!     page_size: usize,
//! }
//!
//! let container = Container::new(
//!     TypeCatalog::new()
//!         .with::<Database>()
//!         .with::<UserService>(),
//! );
//!
//! // Untyped fields are not resolved, they receive their default
//! let users = container.resolve::<UserService>().unwrap();
//! assert_eq!(users.page_size, 0);
//!
//! // Auto-wired instances are memoized
//! let again = container.resolve::<UserService>().unwrap();
//! assert!(Arc::ptr_eq(&users, &again));
//! assert_eq!(
//!     container.handler_kind(autowire::Alias::of::<UserService>()),
//!     Some(HandlerKind::Generated)
//! );
//! ```

pub mod catalog;
pub mod config;
pub mod container;
pub mod dependency_graph;
pub mod errors;
pub mod handler;
pub mod introspect;
pub mod locator;
mod resolver;
pub mod types;

pub use autowire_derive::Autowire;
pub use catalog::TypeCatalog;
pub use config::ResolverConfig;
pub use container::Container;
pub use dependency_graph::{DependencyGraph, DependencyGraphError, DependencyGraphErrors};
pub use errors::{RegisterError, ResolveError};
pub use handler::{Handler, HandlerKind};
pub use introspect::{Arguments, Autowire, Construction, Introspect, Singleton, TypeDescriptor};
pub use types::{Alias, DynError, Injectable, Instance, Parameter};
