//! Auto-wiring engine
//!
//! Turns an alias without a handler into an instance by resolving its
//! constructor parameters through the same container, then caches the
//! result as a generated handler.

use crate::{
    container::Container,
    errors::ResolveError,
    introspect::{Arguments, Construction},
    types::{Alias, Instance, Parameter},
};

mod build_lock;
mod chain;

pub(crate) use build_lock::BuildLock;
pub(crate) use chain::ResolutionChain;

impl Container {
    pub(crate) fn make_in(
        &self,
        alias: &Alias,
        chain: &mut ResolutionChain<'_>,
    ) -> Result<Instance, ResolveError> {
        if let Some(handler) = self.handler(alias) {
            tracing::trace!("Using {:?} handler for '{}'", handler.kind(), alias);
            return handler.invoke(alias);
        }

        let _building = self.build_lock().acquire();
        // Another thread may have finished it while we waited
        if let Some(handler) = self.handler(alias) {
            return handler.invoke(alias);
        }

        chain.enter(alias)?;
        let result = self.autowire(alias, chain);
        chain.exit();
        result
    }

    fn autowire(
        &self,
        alias: &Alias,
        chain: &mut ResolutionChain<'_>,
    ) -> Result<Instance, ResolveError> {
        let descriptor = self
            .introspector()
            .describe(alias)
            .inspect_err(|e| tracing::error!("Cannot auto-wire '{}': {}", alias, e))?;

        let instance = match &descriptor.construction {
            // Never construct a singleton, the type owns its instance
            Construction::Shared(shared_instance) => {
                tracing::debug!("Using shared instance of {}", descriptor.type_name);
                shared_instance()
            }
            Construction::Constructor {
                parameters,
                construct,
            } => {
                let values = self.make_arguments(parameters, chain)?;
                let instance = construct(&mut Arguments::new(alias.clone(), values))?;
                tracing::debug!("Constructed instance of {}", descriptor.type_name);
                instance
            }
        };

        self.insert_generated(alias, instance).invoke(alias)
    }

    /// Resolves every parameter in declaration order
    ///
    /// Untyped parameters receive no value.
    fn make_arguments(
        &self,
        parameters: &[Parameter],
        chain: &mut ResolutionChain<'_>,
    ) -> Result<Vec<Option<Instance>>, ResolveError> {
        parameters
            .iter()
            .map(|parameter| match &parameter.dependency {
                Some(dependency) => self.make_in(dependency, chain).map(Some),
                None => Ok(None),
            })
            .collect()
    }
}
