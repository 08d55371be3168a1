use std::{
    any::Any,
    borrow::Cow,
    fmt::{Debug, Display},
    sync::Arc,
};

/// Failure of a handler or constructor outside this crate
///
/// Errors keep it behind an `Arc` so they can be cloned.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Anything handed out by the container may be shared across threads
/// So anything injectable needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Identifier of a constructible type
///
/// Rust types are known by their `type_name`, see [Alias::of].
/// Any other string works as well, as long as the introspector knows it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alias(Cow<'static, str>);

impl Alias {
    pub fn new(alias: impl Into<Cow<'static, str>>) -> Self {
        Alias(alias.into())
    }

    /// The canonical alias of a type
    pub fn of<T: ?Sized + 'static>() -> Self {
        Alias(Cow::Borrowed(std::any::type_name::<T>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
impl Debug for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}
impl From<&'static str> for Alias {
    fn from(value: &'static str) -> Self {
        Alias(Cow::Borrowed(value))
    }
}
impl From<String> for Alias {
    fn from(value: String) -> Self {
        Alias(Cow::Owned(value))
    }
}
impl From<&Alias> for Alias {
    fn from(value: &Alias) -> Self {
        value.clone()
    }
}

/// A type erased object produced by the container
///
/// Cloning an instance clones the pointer, not the object.
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    instance: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub fn new<ExistingInstance: Injectable>(instance: ExistingInstance) -> Self {
        Self::from_arc(Arc::new(instance))
    }

    /// Wraps an already shared object without copying it
    pub fn from_arc<ExistingInstance: Injectable>(instance: Arc<ExistingInstance>) -> Self {
        Instance {
            type_name: std::any::type_name::<ExistingInstance>(),
            instance,
        }
    }

    /// Name of the concrete type behind this instance
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Injectable>(&self) -> bool {
        self.instance.is::<T>()
    }

    /// Returns the object as `T`, or the actual type name on mismatch
    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.type_name),
        }
    }

    /// True if both instances point to the same object
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.instance, &other.instance)
    }
}
impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.type_name).finish()
    }
}

/// A single constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Field or argument name, used in error messages
    pub name: &'static str,
    /// The type to resolve for this parameter
    ///
    /// `None` means the parameter has no class type and receives no value.
    pub dependency: Option<Alias>,
}

impl Parameter {
    pub fn typed<T: ?Sized + 'static>(name: &'static str) -> Self {
        Parameter {
            name,
            dependency: Some(Alias::of::<T>()),
        }
    }

    /// A typed parameter resolved through a custom alias
    pub fn aliased(name: &'static str, alias: impl Into<Alias>) -> Self {
        Parameter {
            name,
            dependency: Some(alias.into()),
        }
    }

    pub fn untyped(name: &'static str) -> Self {
        Parameter {
            name,
            dependency: None,
        }
    }
}
