//! Command line front end of the Asserts scanner.

pub mod args;
pub mod config;
pub mod output;
pub mod rules;
pub mod scan;
pub mod ui;
