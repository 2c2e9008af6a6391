//! Command-line front end for the PRISM solver: deserialize a JSON problem
//! description, assemble and validate the system, run the solve, and write
//! the correlation curves back out as JSON.

pub mod cli;

pub use cli::{run, run_from_env};
