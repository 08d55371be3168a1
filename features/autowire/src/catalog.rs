use std::collections::BTreeMap;

use crate::{
    errors::ResolveError,
    introspect::{Autowire, Introspect, Singleton, TypeDescriptor},
    types::Alias,
};

/// Map of every type the container may auto-wire
///
/// This is the compile time replacement for runtime reflection:
/// each entry is generated from a type's [Autowire] or [Singleton] impl.
///
/// # Example
/// ```rust
/// use autowire::{Autowire, Container, TypeCatalog};
///
/// #[derive(Autowire, Default)]
/// struct Clock;
///
/// let container = Container::new(TypeCatalog::new().with::<Clock>());
/// let clock = container.resolve::<Clock>().unwrap();
/// ```
#[derive(Default, Clone, Debug)]
pub struct TypeCatalog {
    types: BTreeMap<Alias, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `T` under its canonical alias
    pub fn add<T: Autowire>(&mut self) -> &mut Self {
        self.add_as::<T>(Alias::of::<T>())
    }

    /// Adds `T` under a custom alias
    pub fn add_as<T: Autowire>(&mut self, alias: impl Into<Alias>) -> &mut Self {
        let alias = alias.into();
        self.insert(TypeDescriptor::autowired::<T>(alias))
    }

    /// Adds a type which is only ever obtained through its shared instance
    pub fn add_singleton<T: Singleton>(&mut self) -> &mut Self {
        self.add_singleton_as::<T>(Alias::of::<T>())
    }

    pub fn add_singleton_as<T: Singleton>(&mut self, alias: impl Into<Alias>) -> &mut Self {
        let alias = alias.into();
        self.insert(TypeDescriptor::singleton::<T>(alias))
    }

    /// Adds a descriptor built by hand
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        if let Some(existing) = self.types.insert(descriptor.alias.clone(), descriptor) {
            tracing::warn!(
                "Catalog entry for '{}' ({}) was replaced",
                existing.alias,
                existing.type_name
            );
        }
        self
    }

    pub fn with<T: Autowire>(mut self) -> Self {
        self.add::<T>();
        self
    }

    pub fn with_as<T: Autowire>(mut self, alias: impl Into<Alias>) -> Self {
        self.add_as::<T>(alias);
        self
    }

    pub fn with_singleton<T: Singleton>(mut self) -> Self {
        self.add_singleton::<T>();
        self
    }

    pub fn contains(&self, alias: &Alias) -> bool {
        self.types.contains_key(alias)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Introspect for TypeCatalog {
    fn describe(&self, alias: &Alias) -> Result<TypeDescriptor, ResolveError> {
        self.types
            .get(alias)
            .cloned()
            .ok_or_else(|| ResolveError::TypeNotFound(alias.clone()))
    }

    fn aliases(&self) -> Vec<Alias> {
        self.types.keys().cloned().collect()
    }
}
