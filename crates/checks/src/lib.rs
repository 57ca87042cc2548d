//! Ready-made grammar checks for common weaknesses in source code.
//!
//! Each language module exposes constructors returning [`engine::Check`];
//! [`catalog()`] lists the ones that need no arguments.

pub mod catalog;
pub mod languages;

pub use catalog::{catalog, find, for_language};
pub use languages::*;
