use crate::{config::ResolverConfig, errors::ResolveError, types::Alias};

/// Aliases currently being auto-wired by one `make` call
pub(crate) struct ResolutionChain<'c> {
    config: &'c ResolverConfig,
    chain: Vec<Alias>,
}

impl<'c> ResolutionChain<'c> {
    pub(crate) fn new(config: &'c ResolverConfig) -> Self {
        ResolutionChain {
            config,
            chain: Vec::new(),
        }
    }

    /// Marks `alias` as in progress
    pub(crate) fn enter(&mut self, alias: &Alias) -> Result<(), ResolveError> {
        if self.config.detect_cycles {
            if let Some(start) = self.chain.iter().position(|entry| entry == alias) {
                let mut chain = self.chain[start..].to_vec();
                chain.push(alias.clone()); // Add current so chain is complete

                return Err(ResolveError::CyclicDependency {
                    alias: alias.clone(),
                    chain,
                });
            }
        }

        if let Some(depth) = self.config.depth_limit() {
            if self.chain.len() >= depth {
                return Err(ResolveError::DepthExceeded {
                    alias: alias.clone(),
                    depth,
                });
            }
        }

        self.chain.push(alias.clone());
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        self.chain.pop();
    }
}
