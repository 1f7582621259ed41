//! porter-lib: Core types and logic for building ports
//!
//! This crate drives a port from a source-based ports tree through its build:
//! - `port`: specifiers, resolved ports and their resolution against the catalog
//! - `gate`: status and message confirmation before a port may be built
//! - `build`: prerequisite projection and the single-port build pipeline
//! - `platform`: build/target architecture profile and machine triples
//! - `catalog` / `backend`: the external collaborators and their adapters

pub mod backend;
pub mod build;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod error;
pub mod gate;
pub mod platform;
pub mod port;
pub mod session;
pub mod util;

pub use error::{PortError, Result};
pub use session::Session;
