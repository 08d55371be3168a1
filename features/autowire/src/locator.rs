//! Process-wide access to one [Container]
//!
//! Lets any component resolve or register dependencies without holding a
//! reference to the container. Install the application's container once at
//! startup, before anything calls [global].
//!
//! ```rust
//! use autowire::{locator, Autowire, Container, TypeCatalog};
//!
//! #[derive(Autowire)]
//! struct Mailer;
//!
//! locator::install(Container::new(TypeCatalog::new().with::<Mailer>())).unwrap();
//! let mailer = locator::resolve::<Mailer>().unwrap();
//! ```

use std::sync::{Arc, OnceLock};

use crate::{
    catalog::TypeCatalog,
    container::Container,
    errors::{RegisterError, ResolveError},
    types::{Alias, Injectable, Instance},
};

static GLOBAL_CONTAINER: OnceLock<Container> = OnceLock::new();

/// Installs the process-wide container
///
/// Returns the rejected container if one is already in place.
pub fn install(container: Container) -> Result<&'static Container, Container> {
    let mut candidate = Some(container);
    let installed = GLOBAL_CONTAINER.get_or_init(|| {
        tracing::debug!("Installing global container");
        candidate.take().unwrap_or_else(empty)
    });

    match candidate {
        None => Ok(installed),
        Some(rejected) => Err(rejected),
    }
}

/// The process-wide container
///
/// If none was installed, an empty one is created on first access.
pub fn global() -> &'static Container {
    GLOBAL_CONTAINER.get_or_init(|| {
        tracing::debug!("No container installed, using an empty one");
        empty()
    })
}

fn empty() -> Container {
    Container::new(TypeCatalog::new())
}

/// See [Container::make]
pub fn make(alias: impl Into<Alias>) -> Result<Instance, ResolveError> {
    global().make(alias)
}

/// See [Container::resolve]
pub fn resolve<T: Injectable>() -> Result<Arc<T>, ResolveError> {
    global().resolve::<T>()
}

/// See [Container::register]
pub fn register<T, F>(alias: impl Into<Alias>, handler: F) -> Result<&'static Container, RegisterError>
where
    T: Injectable,
    F: Fn() -> Arc<T> + Send + Sync + 'static,
{
    global().register(alias, handler)
}

/// See [Container::forget]
pub fn forget(alias: impl Into<Alias>) -> &'static Container {
    global().forget(alias)
}

pub fn is_registered(alias: impl Into<Alias>) -> bool {
    global().is_registered(alias)
}
