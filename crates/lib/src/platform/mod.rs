//! Host platform and architecture profile.
//!
//! - [`arch`] - known architectures and their machine triples
//! - [`probe`] - host package-system probe
//! - [`context`] - the per-run [`ArchitectureContext`]
//! - [`paths`] - per-user directories

pub mod arch;
pub mod context;
pub mod paths;
pub mod probe;

pub use arch::{Architecture, KnownTriples, TripleLookup, triple_as_name};
pub use context::{ArchitectureContext, CrossSettings};
pub use probe::{PackageCommandProbe, SystemProbe};
