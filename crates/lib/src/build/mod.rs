//! Building ports.
//!
//! A top-level port is built in two steps: the prerequisites it still needs
//! are projected from the dependency solver's output, then each prerequisite
//! and finally the port itself run through the single-port pipeline.
//!
//! # Submodules
//!
//! - [`deps`] - projection of solver output onto catalog ports
//! - [`orchestrate`] - the build pipeline and output routing

pub mod deps;
pub mod orchestrate;
mod types;

pub use deps::{RequiredPortSet, project_required_ports};
pub use orchestrate::{BuildObserver, BuildOrchestrator, SilentObserver};
pub use types::*;
