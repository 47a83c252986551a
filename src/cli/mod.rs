//! CLI module for the `careerpath` binary
//!
//! Command line argument parsing plus the handlers dispatched from main.

pub mod commands;
pub mod handlers;

pub use commands::*;
pub use handlers::*;
