use std::{
    any::type_name,
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    config::ResolverConfig,
    errors::{RegisterError, ResolveError},
    handler::{Handler, HandlerKind},
    introspect::Introspect,
    resolver::{BuildLock, ResolutionChain},
    types::{Alias, DynError, Injectable, Instance},
};

/// Resolves aliases into fully constructed instances
///
/// Holds the registry of handlers and the introspector used for auto-wiring.
/// Aliases without a handler are auto-wired on first use and memoized.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use autowire::{Autowire, Container, TypeCatalog};
///
/// #[derive(Autowire)]
/// struct Config;
///
/// #[derive(Autowire)]
/// struct Service {
///     config: Arc<Config>,
/// }
///
/// let container = Container::new(TypeCatalog::new().with::<Config>().with::<Service>());
///
/// let service = container.resolve::<Service>().unwrap();
/// let config = container.resolve::<Config>().unwrap();
/// assert!(Arc::ptr_eq(&service.config, &config));
/// ```
pub struct Container {
    registry: RwLock<HashMap<Alias, Handler>>,
    introspector: Arc<dyn Introspect>,
    config: ResolverConfig,
    building: BuildLock,
}
impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.read();
        let mut entries: Vec<_> = registry.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut map = f.debug_struct("Container");
        for (alias, handler) in entries {
            let kind = match handler.kind() {
                HandlerKind::Manual => "manual",
                HandlerKind::Generated => "generated",
            };
            map.field(alias.as_str(), &kind);
        }
        map.finish()
    }
}

impl Container {
    pub fn new(introspector: impl Introspect + 'static) -> Self {
        Self::with_config(introspector, ResolverConfig::default())
    }

    pub fn with_config(introspector: impl Introspect + 'static, config: ResolverConfig) -> Self {
        Self::from_shared(Arc::new(introspector), config)
    }

    /// Creates a container over an introspector shared with others
    pub fn from_shared(introspector: Arc<dyn Introspect>, config: ResolverConfig) -> Self {
        Container {
            registry: RwLock::new(HashMap::new()),
            introspector,
            config,
            building: BuildLock::default(),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn introspector(&self) -> &dyn Introspect {
        self.introspector.as_ref()
    }
}

// Registry
impl Container {
    /// Registers how to create `alias`
    ///
    /// The handler is called on every `make`. Return a clone of an existing
    /// `Arc` to hand out the same object every time.
    ///
    /// Fails if the alias is empty or already has a handler, including
    /// auto-wired ones.
    pub fn register<T, F>(&self, alias: impl Into<Alias>, handler: F) -> Result<&Self, RegisterError>
    where
        T: Injectable,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.insert(alias.into(), Handler::manual(handler))
    }

    /// Registers a handler which may fail
    ///
    /// Failures surface from `make` as [ResolveError::HandlerFailed].
    pub fn try_register<T, E, F>(
        &self,
        alias: impl Into<Alias>,
        handler: F,
    ) -> Result<&Self, RegisterError>
    where
        T: Injectable,
        E: Into<DynError>,
        F: Fn() -> Result<Arc<T>, E> + Send + Sync + 'static,
    {
        self.insert(alias.into(), Handler::fallible(handler))
    }

    /// Registers an already created object, returned by every `make`
    pub fn register_instance<T: Injectable>(
        &self,
        alias: impl Into<Alias>,
        value: T,
    ) -> Result<&Self, RegisterError> {
        self.insert(alias.into(), Handler::instance(value))
    }

    fn insert(&self, alias: Alias, handler: Handler) -> Result<&Self, RegisterError> {
        if alias.as_str().is_empty() {
            return Err(RegisterError::EmptyAlias);
        }

        let mut registry = self.write();
        if registry.contains_key(&alias) {
            return Err(RegisterError::Duplicate(alias));
        }

        tracing::debug!("Registered {:?} handler for '{}'", handler.kind(), alias);
        registry.insert(alias, handler);
        Ok(self)
    }

    /// Removes the handler of `alias`, if any
    ///
    /// Forgetting an auto-wired alias drops the memoized instance,
    /// the next `make` builds a new one.
    pub fn forget(&self, alias: impl Into<Alias>) -> &Self {
        let alias = alias.into();
        if let Some(handler) = self.write().remove(&alias) {
            tracing::debug!("Forgot {:?} handler for '{}'", handler.kind(), alias);
        }
        self
    }

    /// Removes every handler
    pub fn clear(&self) -> &Self {
        self.write().clear();
        self
    }

    pub fn is_registered(&self, alias: impl Into<Alias>) -> bool {
        self.read().contains_key(&alias.into())
    }

    pub fn handler_kind(&self, alias: impl Into<Alias>) -> Option<HandlerKind> {
        self.read().get(&alias.into()).map(Handler::kind)
    }

    /// All aliases with a handler, sorted
    pub fn aliases(&self) -> Vec<Alias> {
        let mut aliases: Vec<_> = self.read().keys().cloned().collect();
        aliases.sort();
        aliases
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub(crate) fn build_lock(&self) -> &BuildLock {
        &self.building
    }

    pub(crate) fn handler(&self, alias: &Alias) -> Option<Handler> {
        self.read().get(alias).cloned()
    }

    /// Stores a generated handler unless another one got there first
    ///
    /// Auto-wiring is serialized, so only a handler registered during
    /// construction can get there first. Returns the handler now bound to
    /// the alias.
    pub(crate) fn insert_generated(&self, alias: &Alias, instance: Instance) -> Handler {
        let mut registry = self.write();
        match registry.get(alias) {
            Some(existing) => {
                tracing::warn!(
                    "'{}' was bound while it was being auto-wired, discarding the new instance",
                    alias
                );
                existing.clone()
            }
            None => {
                let handler = Handler::Generated(instance);
                registry.insert(alias.clone(), handler.clone());
                handler
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Alias, Handler>> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Alias, Handler>> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Resolution
impl Container {
    /// Makes an instance of `alias`
    ///
    /// Uses the registered handler if there is one, otherwise auto-wires the
    /// type and memoizes the result.
    pub fn make(&self, alias: impl Into<Alias>) -> Result<Instance, ResolveError> {
        let alias = alias.into();
        self.make_in(&alias, &mut ResolutionChain::new(&self.config))
    }

    /// Makes `T` through its canonical alias
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>, ResolveError> {
        self.resolve_as::<T>(Alias::of::<T>())
    }

    /// Makes `alias`, which must produce a `T`
    pub fn resolve_as<T: Injectable>(&self, alias: impl Into<Alias>) -> Result<Arc<T>, ResolveError> {
        self.make(alias)?
            .downcast::<T>()
            .map_err(|actual_type| ResolveError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type,
            })
    }
}
