//! Command-line front end: argument parsing and report rendering.

pub mod args;
pub mod output;
