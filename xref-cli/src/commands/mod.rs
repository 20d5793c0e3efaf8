//! Command implementations for the xref CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod load;
