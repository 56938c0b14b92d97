//! mtnav navigation core
//!
//! A directed graph of named destinations per implementation. Each
//! destination is a [`NavigateStep`] that knows whether the target is already
//! there, which destination must be reached first, and how to make the one
//! hop from it. [`Navigate::navigate`] walks the prerequisite chain, retries
//! failing transitions and hands back the destination's [`View`].
//!
//! [`ImplementationContext`] routes named capabilities to whichever
//! implementation (UI, REST) declares them.

pub mod args;
pub mod context;
pub mod graph;
pub mod step;
pub mod view;

pub use args::NavArgs;
pub use context::{ExternalMethods, ImplementationContext, MethodTable};
pub use graph::{Navigate, NavigateBuilder, DEFAULT_TRIES};
pub use step::{Navigable, NavigateStep, Prerequisite, StepContext, StepState};
pub use view::View;
