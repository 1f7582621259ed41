//! Ports and port specifiers.
//!
//! A port is a buildable unit described by a recipe and identified by
//! `name-version`. The catalog owns the ports; this module defines the
//! values handed around for one run and how a user-supplied specifier is
//! resolved to one of them.

mod spec;
mod types;

pub use spec::{PortSpecifier, resolve_specifier};
pub use types::*;
