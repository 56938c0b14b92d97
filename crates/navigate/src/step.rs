//! A single node of the navigation graph and the per-attempt state it runs in

use tracing::{debug, trace};

use mtnav_common::{Error, Result};

use crate::args::NavArgs;
use crate::view::View;

/// Anything a navigation can be run for
pub trait Navigable {
    /// Name used in navigation logs
    fn nav_name(&self) -> String;
}

/// The destination that must be reached immediately before a step runs
pub enum Prerequisite<T: ?Sized> {
    /// Another destination of the same target
    Sibling(String),
    /// A destination of an object reachable from the target.
    ///
    /// An attribute that hands back the target itself for the same destination
    /// means there is no related object, and the prerequisite is skipped.
    Attribute {
        attribute: fn(&T) -> &T,
        destination: String,
    },
}

impl<T: ?Sized> Prerequisite<T> {
    pub fn sibling(destination: impl Into<String>) -> Self {
        Prerequisite::Sibling(destination.into())
    }

    pub fn attribute(attribute: fn(&T) -> &T, destination: impl Into<String>) -> Self {
        Prerequisite::Attribute {
            attribute,
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            Prerequisite::Sibling(destination) => destination,
            Prerequisite::Attribute { destination, .. } => destination,
        }
    }
}

/// Lifecycle of one step attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    #[default]
    NotInstantiated,
    PrerequisitePending,
    Stepping,
    Here,
    Failed,
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepState::NotInstantiated => write!(f, "not-instantiated"),
            StepState::PrerequisitePending => write!(f, "prerequisite-pending"),
            StepState::Stepping => write!(f, "stepping"),
            StepState::Here => write!(f, "here"),
            StepState::Failed => write!(f, "failed"),
        }
    }
}

/// How to detect and reach one destination.
///
/// A fresh step is built by its registered factory for every attempt, so
/// implementations are usually unit structs.
pub trait NavigateStep<T: ?Sized> {
    fn prerequisite(&self) -> Option<Prerequisite<T>> {
        None
    }

    /// Build the view this destination lands on; `None` when the step declares no view.
    fn create_view(&self, _target: &T) -> Option<Result<Box<dyn View>>> {
        None
    }

    /// Whether the target is already at this destination.
    ///
    /// Errors are treated as "not here" by the graph.
    fn am_i_here(&self, cx: &mut StepContext<'_, T>) -> Result<bool> {
        cx.view()?.is_displayed()
    }

    /// Transition from the prerequisite's state to this destination
    fn step(&self, cx: &mut StepContext<'_, T>) -> Result<()>;

    /// Bring an already reached destination back to a neutral state
    fn resetter(&self, _cx: &mut StepContext<'_, T>) -> Result<()> {
        Ok(())
    }
}

/// One instantiated step: the target, the call's arguments and the lazily built view
pub struct StepContext<'a, T: ?Sized> {
    target: &'a T,
    namespace: &'a str,
    destination: &'a str,
    args: &'a NavArgs,
    step: &'a dyn NavigateStep<T>,
    attempt: usize,
    tries: usize,
    state: StepState,
    view: Option<Box<dyn View>>,
}

impl<'a, T: ?Sized> StepContext<'a, T> {
    pub(crate) fn new(
        target: &'a T,
        namespace: &'a str,
        destination: &'a str,
        args: &'a NavArgs,
        step: &'a dyn NavigateStep<T>,
        attempt: usize,
        tries: usize,
    ) -> Self {
        Self {
            target,
            namespace,
            destination,
            args,
            step,
            attempt,
            tries,
            state: StepState::NotInstantiated,
            view: None,
        }
    }

    pub fn target(&self) -> &'a T {
        self.target
    }

    pub fn destination(&self) -> &'a str {
        self.destination
    }

    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    pub fn args(&self) -> &'a NavArgs {
        self.args
    }

    pub(crate) fn step(&self) -> &'a dyn NavigateStep<T> {
        self.step
    }

    /// 1-based attempt number within the current navigation
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    pub fn tries(&self) -> usize {
        self.tries
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: StepState) {
        trace!(
            namespace = self.namespace,
            destination = self.destination,
            from = %self.state,
            to = %state,
            "step state"
        );
        self.state = state;
    }

    /// The step's view, built on first access and reused for the rest of the attempt
    pub fn view(&mut self) -> Result<&dyn View> {
        if self.view.is_none() {
            let view = self.step.create_view(self.target).ok_or_else(|| {
                Error::Configuration(format!(
                    "{} does not have a view specified",
                    self.destination
                ))
            })??;
            self.view = Some(view);
        }
        self.view
            .as_deref()
            .ok_or_else(|| Error::Configuration(format!("view for {} was not built", self.destination)))
    }

    /// Presence check that never fails: any error means "not here"
    pub fn is_here(&mut self) -> bool {
        let step = self.step;
        match step.am_i_here(self) {
            Ok(here) => here,
            Err(e) => {
                debug!(
                    namespace = self.namespace,
                    destination = self.destination,
                    "presence check failed, treating as not here: {}",
                    e
                );
                false
            }
        }
    }

    pub(crate) fn reset(&mut self) -> Result<()> {
        if self.args.get_bool("use_resetter") == Some(false) {
            return Ok(());
        }
        let step = self.step;
        step.resetter(self)
    }

    /// Hand back the view of a reached destination, if the step declares one
    pub(crate) fn finish(mut self) -> Result<Option<Box<dyn View>>> {
        if let Some(view) = self.view.take() {
            return Ok(Some(view));
        }
        match self.step.create_view(self.target) {
            Some(view) => view.map(Some),
            None => Ok(None),
        }
    }
}
