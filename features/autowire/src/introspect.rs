use std::{any::type_name, fmt::Debug, sync::Arc};

use crate::{
    errors::ResolveError,
    types::{Alias, Injectable, Instance, Parameter},
};

/// A type the container can build from its constructor parameters
///
/// Usually derived, see [`macro@crate::Autowire`].
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use autowire::{Arguments, Autowire, Parameter, ResolveError};
///
/// struct Pool;
/// impl Autowire for Pool {
///     fn construct(_: &mut Arguments) -> Result<Self, ResolveError> {
///         Ok(Pool)
///     }
/// }
///
/// struct Repository {
///     pool: Arc<Pool>,
///     retries: u32,
/// }
/// impl Autowire for Repository {
///     fn parameters() -> Vec<Parameter> {
///         vec![Parameter::typed::<Pool>("pool"), Parameter::untyped("retries")]
///     }
///
///     fn construct(args: &mut Arguments) -> Result<Self, ResolveError> {
///         let pool = args.arg::<Pool>()?;
///         args.skip()?;
///         Ok(Repository { pool, retries: 0 })
///     }
/// }
/// ```
pub trait Autowire: Injectable + Sized {
    /// Constructor parameters in declaration order
    fn parameters() -> Vec<Parameter> {
        Vec::new()
    }

    /// Builds the type from arguments resolved for [Autowire::parameters]
    fn construct(args: &mut Arguments) -> Result<Self, ResolveError>;
}

/// A type which guarantees a single shared instance per process
///
/// The container never calls a constructor for these,
/// it always asks [Singleton::shared_instance].
pub trait Singleton: Injectable {
    fn shared_instance() -> Arc<Self>;
}

/// Positional arguments handed to a constructor
///
/// Typed parameters hold their resolved instance, untyped ones hold nothing.
pub struct Arguments {
    alias: Alias,
    values: std::vec::IntoIter<Option<Instance>>,
    position: usize,
}

impl Arguments {
    pub fn new(alias: Alias, values: Vec<Option<Instance>>) -> Self {
        Arguments {
            alias,
            values: values.into_iter(),
            position: 0,
        }
    }

    /// The alias being constructed
    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    /// Number of arguments not yet taken
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Takes the next argument as is
    pub fn next_value(&mut self) -> Result<Option<Instance>, ResolveError> {
        let value = self
            .values
            .next()
            .ok_or_else(|| self.unresolvable("no argument was supplied".to_string()))?;
        self.position += 1;
        Ok(value)
    }

    /// Takes the next argument, which must be an instance of `T`
    pub fn arg<T: Injectable>(&mut self) -> Result<Arc<T>, ResolveError> {
        match self.optional::<T>()? {
            Some(value) => Ok(value),
            None => Err(self.unresolvable_previous(format!(
                "expected '{}' but the parameter has no class type",
                type_name::<T>()
            ))),
        }
    }

    /// Takes the next argument if there is a value for it
    pub fn optional<T: Injectable>(&mut self) -> Result<Option<Arc<T>>, ResolveError> {
        let Some(instance) = self.next_value()? else {
            return Ok(None);
        };

        instance.downcast::<T>().map(Some).map_err(|actual| {
            self.unresolvable_previous(format!(
                "expected '{}' but got '{}'",
                type_name::<T>(),
                actual
            ))
        })
    }

    /// Skips an untyped argument
    pub fn skip(&mut self) -> Result<(), ResolveError> {
        self.next_value().map(|_| ())
    }

    fn unresolvable(&self, reason: String) -> ResolveError {
        ResolveError::UnresolvableParameter {
            alias: self.alias.clone(),
            position: self.position,
            reason,
        }
    }

    fn unresolvable_previous(&self, reason: String) -> ResolveError {
        ResolveError::UnresolvableParameter {
            alias: self.alias.clone(),
            position: self.position.saturating_sub(1),
            reason,
        }
    }
}

pub type ConstructFn = Arc<dyn Fn(&mut Arguments) -> Result<Instance, ResolveError> + Send + Sync>;
pub type SharedFn = Arc<dyn Fn() -> Instance + Send + Sync>;

/// How an introspected type gets its instance
#[derive(Clone)]
pub enum Construction {
    /// Built through its constructor from resolved arguments
    Constructor {
        parameters: Vec<Parameter>,
        construct: ConstructFn,
    },
    /// Obtained from the type's shared-instance accessor
    Shared(SharedFn),
}

/// Everything the container needs to know to build a type
#[derive(Clone)]
pub struct TypeDescriptor {
    pub alias: Alias,
    pub type_name: &'static str,
    pub construction: Construction,
}

impl TypeDescriptor {
    pub fn autowired<T: Autowire>(alias: Alias) -> Self {
        TypeDescriptor {
            alias,
            type_name: type_name::<T>(),
            construction: Construction::Constructor {
                parameters: T::parameters(),
                construct: Arc::new(|args: &mut Arguments| T::construct(args).map(Instance::new)),
            },
        }
    }

    pub fn singleton<T: Singleton>(alias: Alias) -> Self {
        TypeDescriptor {
            alias,
            type_name: type_name::<T>(),
            construction: Construction::Shared(Arc::new(|| {
                Instance::from_arc(T::shared_instance())
            })),
        }
    }

    /// Parameters which need resolving before construction
    ///
    /// Shared types have none.
    pub fn parameters(&self) -> &[Parameter] {
        match &self.construction {
            Construction::Constructor { parameters, .. } => parameters.as_slice(),
            Construction::Shared(_) => &[],
        }
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self.construction, Construction::Shared(_))
    }
}
impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("alias", &self.alias)
            .field("type_name", &self.type_name)
            .field("singleton", &self.is_singleton())
            .field("parameters", &self.parameters())
            .finish()
    }
}

/// Source of type metadata for auto-wiring
pub trait Introspect: Send + Sync {
    /// Describes how to build `alias`
    ///
    /// Unknown aliases must return [ResolveError::TypeNotFound]
    fn describe(&self, alias: &Alias) -> Result<TypeDescriptor, ResolveError>;

    /// Every alias this introspector can describe
    fn aliases(&self) -> Vec<Alias>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dep;

    fn args(values: Vec<Option<Instance>>) -> Arguments {
        Arguments::new(Alias::new("Target"), values)
    }

    #[test]
    fn arguments_are_taken_in_order() {
        let mut args = args(vec![Some(Instance::new(Dep)), None, Some(Instance::new(7u8))]);
        assert_eq!(args.remaining(), 3);
        assert!(args.arg::<Dep>().is_ok());
        args.skip().unwrap();
        assert_eq!(*args.arg::<u8>().unwrap(), 7);
        assert_eq!(args.remaining(), 0);
    }

    #[test]
    fn wrong_type_reports_position() {
        let mut args = args(vec![None, Some(Instance::new(Dep))]);
        assert!(args.optional::<Dep>().unwrap().is_none());

        match args.arg::<String>() {
            Err(ResolveError::UnresolvableParameter {
                alias, position, ..
            }) => {
                assert_eq!(alias, Alias::new("Target"));
                assert_eq!(position, 1);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn exhausted_arguments_fail() {
        let mut args = args(vec![]);
        assert!(matches!(
            args.skip(),
            Err(ResolveError::UnresolvableParameter { position: 0, .. })
        ));
    }

    #[test]
    fn untyped_argument_is_not_an_instance() {
        let mut args = args(vec![None]);
        assert!(matches!(
            args.arg::<Dep>(),
            Err(ResolveError::UnresolvableParameter { position: 0, .. })
        ));
    }
}
