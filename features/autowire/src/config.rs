/// Chain length allowed when cycle detection is off and no limit was set
pub const FALLBACK_MAX_DEPTH: usize = 64;

/// Tunables for the auto-wiring engine
///
/// With cycle detection on, nesting is bounded by the number of distinct
/// aliases, so no depth limit applies unless one is set.
///
/// # Example
/// ```rust
/// use autowire::ResolverConfig;
///
/// let config = ResolverConfig::default();
/// assert!(config.detect_cycles);
/// assert_eq!(config.depth_limit(), None);
///
/// let config = config.with_max_depth(16);
/// assert_eq!(config.depth_limit(), Some(16));
///
/// let config = ResolverConfig::default().with_cycle_detection(false);
/// assert_eq!(config.depth_limit(), Some(64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Fail with `CyclicDependency` when a type transitively requires itself
    pub detect_cycles: bool,
    /// Longest chain of nested auto-wiring before failing with `DepthExceeded`
    pub max_depth: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            detect_cycles: true,
            max_depth: None,
        }
    }
}

impl ResolverConfig {
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// The depth actually enforced
    ///
    /// Without cycle detection a limit is always enforced, falling back to
    /// [FALLBACK_MAX_DEPTH].
    pub fn depth_limit(&self) -> Option<usize> {
        match (self.max_depth, self.detect_cycles) {
            (Some(max_depth), _) => Some(max_depth),
            (None, true) => None,
            (None, false) => Some(FALLBACK_MAX_DEPTH),
        }
    }
}
