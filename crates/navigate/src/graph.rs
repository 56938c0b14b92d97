//! Navigation graph: destination registry, prerequisite traversal and retries

use std::collections::BTreeMap;
use tracing::debug;

use mtnav_common::{Error, Result};

use crate::args::NavArgs;
use crate::step::{Navigable, NavigateStep, Prerequisite, StepContext, StepState};
use crate::view::View;

/// Attempts per destination unless the caller asks otherwise
pub const DEFAULT_TRIES: usize = 3;

type StepFactory<T> = Box<dyn Fn() -> Box<dyn NavigateStep<T>> + Send + Sync>;

/// Destinations of one implementation's namespace
pub struct Navigate<T: ?Sized> {
    namespace: String,
    destinations: BTreeMap<String, StepFactory<T>>,
}

/// Collects registrations; frozen into a [`Navigate`] by [`NavigateBuilder::build`]
pub struct NavigateBuilder<T: ?Sized> {
    namespace: String,
    destinations: BTreeMap<String, StepFactory<T>>,
}

/// Why an attempt did not reach its destination
enum Failure {
    /// The prerequisite chain failed after its own retries
    Prerequisite(Error),
    /// This destination's own transition failed
    Step(Error),
}

impl<T: ?Sized + Navigable + 'static> NavigateBuilder<T> {
    /// Bind a step to a destination name.
    ///
    /// The factory runs once per navigation attempt. Registering a name twice
    /// in the same namespace is a configuration error.
    pub fn register<S, F>(&mut self, name: &str, factory: F) -> Result<&mut Self>
    where
        S: NavigateStep<T> + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        if self.destinations.contains_key(name) {
            return Err(Error::Configuration(format!(
                "destination {} is already registered for {}",
                name, self.namespace
            )));
        }
        debug!(namespace = %self.namespace, destination = name, "registering destination");
        self.destinations.insert(
            name.to_string(),
            Box::new(move || Box::new(factory()) as Box<dyn NavigateStep<T>>),
        );
        Ok(self)
    }

    pub fn build(self) -> Navigate<T> {
        Navigate {
            namespace: self.namespace,
            destinations: self.destinations,
        }
    }
}

impl<T: ?Sized + Navigable + 'static> Navigate<T> {
    pub fn builder(namespace: impl Into<String>) -> NavigateBuilder<T> {
        NavigateBuilder {
            namespace: namespace.into(),
            destinations: BTreeMap::new(),
        }
    }

    /// A namespace with no destinations
    pub fn empty(namespace: impl Into<String>) -> Self {
        Self::builder(namespace).build()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registered destination names, sorted
    pub fn list_destinations(&self) -> Vec<&str> {
        self.destinations.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, destination: &str) -> bool {
        self.destinations.contains_key(destination)
    }

    /// Name of the destination that must be reached before `destination`
    pub fn prerequisite_of(&self, destination: &str) -> Result<Option<String>> {
        let factory =
            self.destinations
                .get(destination)
                .ok_or_else(|| Error::DestinationNotFound {
                    namespace: self.namespace.clone(),
                    destination: destination.to_string(),
                })?;
        Ok(factory()
            .prerequisite()
            .map(|prerequisite| prerequisite.destination().to_string()))
    }

    /// Navigate with the default tries budget
    pub fn navigate(
        &self,
        target: &T,
        destination: &str,
        args: &NavArgs,
    ) -> Result<Option<Box<dyn View>>> {
        self.navigate_with(target, destination, args, DEFAULT_TRIES)
    }

    /// Reach `destination` for `target`, entering prerequisites first.
    ///
    /// Returns the destination's view when its step declares one. A failing
    /// transition is retried until `tries` attempts have been made; the last
    /// error is then returned as-is. A `tries` of zero still makes one attempt.
    pub fn navigate_with(
        &self,
        target: &T,
        destination: &str,
        args: &NavArgs,
        tries: usize,
    ) -> Result<Option<Box<dyn View>>> {
        let mut chain = Vec::new();
        self.go(target, destination, args, tries.max(1), &mut chain)
    }

    fn go(
        &self,
        target: &T,
        destination: &str,
        args: &NavArgs,
        tries: usize,
        chain: &mut Vec<(usize, String)>,
    ) -> Result<Option<Box<dyn View>>> {
        let factory =
            self.destinations
                .get(destination)
                .ok_or_else(|| Error::DestinationNotFound {
                    namespace: self.namespace.clone(),
                    destination: destination.to_string(),
                })?;

        // The same destination on another object (an attribute prerequisite) is not a cycle
        let identity = target as *const T as *const () as usize;
        if chain
            .iter()
            .any(|(id, d)| *id == identity && d == destination)
        {
            let mut path: Vec<&str> = chain.iter().map(|(_, d)| d.as_str()).collect();
            path.push(destination);
            return Err(Error::Configuration(format!(
                "prerequisite cycle in {}: {}",
                self.namespace,
                path.join(" -> ")
            )));
        }

        chain.push((identity, destination.to_string()));
        let result = self.traverse(target, destination, factory, args, tries, chain);
        chain.pop();
        result
    }

    fn traverse(
        &self,
        target: &T,
        destination: &str,
        factory: &StepFactory<T>,
        args: &NavArgs,
        tries: usize,
        chain: &mut Vec<(usize, String)>,
    ) -> Result<Option<Box<dyn View>>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let step = factory();
            let mut cx = StepContext::new(
                target,
                &self.namespace,
                destination,
                args,
                step.as_ref(),
                attempt,
                tries,
            );

            debug!(
                namespace = %self.namespace,
                destination,
                target = %target.nav_name(),
                attempt,
                tries,
                ?args,
                "invoking navigation step"
            );

            match self.enter(&mut cx, chain) {
                Ok(()) => return cx.finish(),
                Err(Failure::Prerequisite(e)) => {
                    cx.set_state(StepState::Failed);
                    return Err(e);
                }
                Err(Failure::Step(e)) if attempt < tries => {
                    debug!(
                        namespace = %self.namespace,
                        destination,
                        attempt,
                        tries,
                        "step failed, retrying: {}",
                        e
                    );
                }
                Err(Failure::Step(e)) => {
                    cx.set_state(StepState::Failed);
                    debug!(
                        namespace = %self.namespace,
                        destination,
                        attempt,
                        "step failed, no tries left: {}",
                        e
                    );
                    return Err(e);
                }
            }
        }
    }

    /// One attempt: presence check, prerequisite chain, transition
    fn enter(
        &self,
        cx: &mut StepContext<'_, T>,
        chain: &mut Vec<(usize, String)>,
    ) -> std::result::Result<(), Failure> {
        if cx.is_here() {
            debug!(
                namespace = %self.namespace,
                destination = cx.destination(),
                "already here"
            );
            cx.set_state(StepState::Here);
            return cx.reset().map_err(Failure::Step);
        }

        if let Some(prerequisite) = cx.step().prerequisite() {
            cx.set_state(StepState::PrerequisitePending);
            let (target, destination) = match &prerequisite {
                Prerequisite::Sibling(destination) => (cx.target(), destination.as_str()),
                Prerequisite::Attribute {
                    attribute,
                    destination,
                } => (attribute(cx.target()), destination.as_str()),
            };
            let unrelated = matches!(prerequisite, Prerequisite::Attribute { .. })
                && std::ptr::eq(
                    target as *const T as *const (),
                    cx.target() as *const T as *const (),
                )
                && destination == cx.destination();
            if unrelated {
                debug!(
                    namespace = %self.namespace,
                    destination,
                    "attribute prerequisite resolved to the target itself, skipping"
                );
            } else {
                self.go(target, destination, cx.args(), cx.tries(), chain)
                    .map_err(Failure::Prerequisite)?;
            }
        }

        cx.set_state(StepState::Stepping);
        let step = cx.step();
        step.step(cx).map_err(Failure::Step)?;
        cx.set_state(StepState::Here);
        cx.reset().map_err(Failure::Step)
    }
}

impl<T: ?Sized> std::fmt::Debug for Navigate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigate")
            .field("namespace", &self.namespace)
            .field("destinations", &self.destinations.keys().collect::<Vec<_>>())
            .finish()
    }
}
