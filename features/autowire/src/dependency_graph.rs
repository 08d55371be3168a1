use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use crate::{container::Container, errors::ResolveError, introspect::Introspect, types::Alias};

/// Graph of every auto-wirable type
/// Used to check circular and missing dependencies before anything is made
pub struct DependencyGraph {
    map: BTreeMap<Alias, DependencyGraphEntry>,
    /// Aliases with a handler, these are never auto-wired
    registered: HashSet<Alias>,
}
impl DependencyGraph {
    pub fn new(
        introspector: &dyn Introspect,
        registered: impl IntoIterator<Item = Alias>,
    ) -> Result<Self, DependencyGraphErrors> {
        let mut graph = Self {
            map: Default::default(),
            registered: registered.into_iter().collect(),
        };

        let mut errors = Vec::new();
        for alias in introspector.aliases() {
            if graph.registered.contains(&alias) {
                continue;
            }

            match introspector.describe(&alias) {
                Ok(descriptor) => {
                    let dependencies = descriptor
                        .parameters()
                        .iter()
                        .filter_map(|parameter| parameter.dependency.clone())
                        .collect();
                    graph.map.insert(
                        alias,
                        DependencyGraphEntry {
                            alias: descriptor.alias,
                            dependencies,
                        },
                    );
                }
                Err(error) => errors.push(DependencyGraphError::Introspection(error)),
            }
        }

        if !errors.is_empty() {
            return Err(DependencyGraphErrors { errors });
        }

        Ok(graph)
    }

    /// Typed dependencies of an auto-wirable alias
    pub fn dependencies(&self, alias: &Alias) -> Option<&[Alias]> {
        self.map
            .get(alias)
            .map(|entry| entry.dependencies.as_slice())
    }

    /// Validate the graph
    ///
    /// Returns a list of all issues
    pub fn check(&self) -> Result<(), DependencyGraphErrors> {
        let mut checked = HashSet::new();
        let mut errors = Vec::new();
        for entry in self.map.values() {
            let mut dependency_chain = Vec::new();
            check_recurse(
                self,
                &mut checked,
                &mut errors,
                &mut dependency_chain,
                entry,
            );
        }

        if !errors.is_empty() {
            return Err(DependencyGraphErrors { errors });
        }

        return Ok(());

        fn check_recurse<'g>(
            graph: &'g DependencyGraph,
            checked: &mut HashSet<&'g Alias>,
            errors: &mut Vec<DependencyGraphError>,
            dependency_chain: &mut Vec<&'g Alias>,
            entry: &'g DependencyGraphEntry,
        ) {
            // Circular Dependency Check
            if let Some(start) = dependency_chain
                .iter()
                .position(|alias| *alias == &entry.alias)
            {
                let mut chain: Vec<Alias> = dependency_chain[start..]
                    .iter()
                    .map(|alias| (*alias).clone())
                    .collect();
                chain.push(entry.alias.clone()); // Add current so chain is complete

                errors.push(DependencyGraphError::CircularDependency {
                    from: chain[0].clone(),
                    to: entry.alias.clone(),
                    chain,
                });
            }

            // Skip other checks if already checked
            if !checked.insert(&entry.alias) {
                return;
            };

            dependency_chain.push(&entry.alias);

            for dependency in &entry.dependencies {
                if graph.registered.contains(dependency) {
                    continue;
                }

                let Some(next_entry) = graph.map.get(dependency) else {
                    errors.push(DependencyGraphError::MissingDependency {
                        dependency: dependency.clone(),
                        required_by: entry.alias.clone(),
                    });
                    continue;
                };

                check_recurse(graph, checked, errors, dependency_chain, next_entry);
            }

            dependency_chain.pop();
        }
    }
}

struct DependencyGraphEntry {
    alias: Alias,
    dependencies: Vec<Alias>,
}

impl Container {
    /// Snapshot of the auto-wirable types, leaving out registered aliases
    pub fn dependency_graph(&self) -> Result<DependencyGraph, DependencyGraphErrors> {
        DependencyGraph::new(self.introspector(), self.aliases())
    }

    /// Checks that everything the introspector knows could be made
    pub fn validate(&self) -> Result<(), DependencyGraphErrors> {
        self.dependency_graph()?.check()
    }
}

#[derive(Error, Debug, Clone)]
pub enum DependencyGraphError {
    #[error("'{required_by}' needs '{dependency}' but it is missing")]
    MissingDependency {
        dependency: Alias,
        required_by: Alias,
    },
    #[error("'{from}' depends on itself through {chain:?}, register a handler for one of them")]
    CircularDependency {
        from: Alias,
        to: Alias,
        chain: Vec<Alias>,
    },
    #[error(transparent)]
    Introspection(ResolveError),
}

/// Everything `validate` found wrong, in the order it was found
#[derive(Error, Debug, Clone)]
pub struct DependencyGraphErrors {
    pub errors: Vec<DependencyGraphError>,
}
impl std::fmt::Display for DependencyGraphErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation found {} problem(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  * {error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        catalog::TypeCatalog,
        introspect::{Arguments, Autowire},
        types::Parameter,
    };

    struct Leaf;
    impl Autowire for Leaf {
        fn construct(_: &mut Arguments) -> Result<Self, ResolveError> {
            Ok(Leaf)
        }
    }

    struct Root(#[allow(dead_code)] Arc<Leaf>);
    impl Autowire for Root {
        fn parameters() -> Vec<Parameter> {
            vec![Parameter::typed::<Leaf>("leaf"), Parameter::untyped("size")]
        }

        fn construct(args: &mut Arguments) -> Result<Self, ResolveError> {
            let leaf = args.arg()?;
            args.skip()?;
            Ok(Root(leaf))
        }
    }

    struct Left;
    impl Autowire for Left {
        fn parameters() -> Vec<Parameter> {
            vec![Parameter::aliased("right", "Right")]
        }

        fn construct(_: &mut Arguments) -> Result<Self, ResolveError> {
            Ok(Left)
        }
    }

    struct Right;
    impl Autowire for Right {
        fn parameters() -> Vec<Parameter> {
            vec![Parameter::aliased("left", "Left")]
        }

        fn construct(_: &mut Arguments) -> Result<Self, ResolveError> {
            Ok(Right)
        }
    }

    #[test]
    fn complete_graph_is_valid() {
        let container = Container::new(TypeCatalog::new().with::<Leaf>().with::<Root>());
        assert!(container.validate().is_ok());

        let graph = container.dependency_graph().unwrap();
        assert_eq!(
            graph.dependencies(&Alias::of::<Root>()),
            Some([Alias::of::<Leaf>()].as_slice())
        );
    }

    #[test]
    fn missing_dependency_is_reported() {
        let container = Container::new(TypeCatalog::new().with::<Root>());
        let errors = container.validate().unwrap_err().errors;
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            DependencyGraphError::MissingDependency { dependency, required_by }
                if *dependency == Alias::of::<Leaf>() && *required_by == Alias::of::<Root>()
        ));
    }

    #[test]
    fn registered_alias_satisfies_dependency() {
        let container = Container::new(TypeCatalog::new().with::<Root>());
        container.register_instance(Alias::of::<Leaf>(), Leaf).unwrap();
        assert!(container.validate().is_ok());
    }

    #[test]
    fn cycle_is_reported_once() {
        let container = Container::new(
            TypeCatalog::new()
                .with_as::<Left>("Left")
                .with_as::<Right>("Right"),
        );
        let errors = container.validate().unwrap_err().errors;
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            DependencyGraphError::CircularDependency { from, to, chain } => {
                assert_eq!(from, &Alias::new("Left"));
                assert_eq!(to, &Alias::new("Left"));
                assert_eq!(
                    chain,
                    &vec![Alias::new("Left"), Alias::new("Right"), Alias::new("Left")]
                );
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn errors_are_listed_one_per_line() {
        let container = Container::new(
            TypeCatalog::new()
                .with::<Root>()
                .with_as::<Left>("Left")
                .with_as::<Right>("Right"),
        );
        let message = container.validate().unwrap_err().to_string();
        let lines: Vec<_> = message.lines().collect();
        assert_eq!(lines[0], "Validation found 2 problem(s)");
        assert!(lines[1..].iter().all(|line| line.starts_with("  * ")));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn registered_alias_breaks_cycle() {
        let container = Container::new(
            TypeCatalog::new()
                .with_as::<Left>("Left")
                .with_as::<Right>("Right"),
        );
        container.register_instance("Right", Right).unwrap();
        assert!(container.validate().is_ok());
    }
}
