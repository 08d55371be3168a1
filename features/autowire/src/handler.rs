use std::{fmt::Debug, sync::Arc};

use crate::{
    errors::ResolveError,
    types::{Alias, DynError, Injectable, Instance},
};

pub type Factory = Arc<dyn Fn() -> Result<Instance, DynError> + Send + Sync>;

/// Entry of the container's registry
#[derive(Clone)]
pub enum Handler {
    /// Registered by the caller, invoked on every `make`
    Manual(Factory),
    /// Produced by auto-wiring, always yields the same instance
    Generated(Instance),
}

/// Which kind of [Handler] an alias is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Manual,
    Generated,
}

impl Handler {
    pub fn manual<T, F>(factory: F) -> Self
    where
        T: Injectable,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        Handler::Manual(Arc::new(move || {
            Ok::<_, DynError>(Instance::from_arc(factory()))
        }))
    }

    pub fn fallible<T, E, F>(factory: F) -> Self
    where
        T: Injectable,
        E: Into<DynError>,
        F: Fn() -> Result<Arc<T>, E> + Send + Sync + 'static,
    {
        Handler::Manual(Arc::new(move || {
            let made: Result<Instance, DynError> =
                factory().map(Instance::from_arc).map_err(Into::into);
            made
        }))
    }

    /// A manual handler handing out one pre-built object
    pub fn instance<T: Injectable>(value: T) -> Self {
        let instance = Instance::new(value);
        Handler::Manual(Arc::new(move || Ok::<_, DynError>(instance.clone())))
    }

    pub fn kind(&self) -> HandlerKind {
        match self {
            Handler::Manual(_) => HandlerKind::Manual,
            Handler::Generated(_) => HandlerKind::Generated,
        }
    }

    pub(crate) fn invoke(&self, alias: &Alias) -> Result<Instance, ResolveError> {
        match self {
            Handler::Manual(factory) => factory().map_err(|error| ResolveError::HandlerFailed {
                alias: alias.clone(),
                error: Arc::new(error),
            }),
            Handler::Generated(instance) => Ok(instance.clone()),
        }
    }
}
impl Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Manual(_) => f.write_str("Manual"),
            Handler::Generated(instance) => f.debug_tuple("Generated").field(instance).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn manual_handler_runs_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handler = Handler::manual(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(String::from("fresh"))
        });
        let alias = Alias::new("Text");

        let first = handler.invoke(&alias).unwrap();
        let second = handler.invoke(&alias).unwrap();
        assert!(!first.ptr_eq(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(handler.kind(), HandlerKind::Manual);
    }

    #[test]
    fn generated_and_instance_handlers_are_stable() {
        let alias = Alias::new("Number");
        let generated = Handler::Generated(Instance::new(5u32));
        assert!(generated
            .invoke(&alias)
            .unwrap()
            .ptr_eq(&generated.invoke(&alias).unwrap()));
        assert_eq!(generated.kind(), HandlerKind::Generated);

        let prebuilt = Handler::instance(5u32);
        assert!(prebuilt
            .invoke(&alias)
            .unwrap()
            .ptr_eq(&prebuilt.invoke(&alias).unwrap()));
    }

    #[test]
    fn fallible_handler_error_names_alias() {
        let handler = Handler::fallible(|| Err::<Arc<u8>, _>("offline"));
        match handler.invoke(&Alias::new("Socket")) {
            Err(ResolveError::HandlerFailed { alias, error }) => {
                assert_eq!(alias, Alias::new("Socket"));
                assert_eq!(error.to_string(), "offline");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
