//! Shared utilities.
//!
//! Version ordering and test helpers.

pub mod version;
