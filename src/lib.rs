//! clipvault: clipboard change monitor with content-addressed history capture.
//!
//! The binary is a thin clap front end over [`bootstrap`], which loads
//! configuration, initialises tracing and wires the workspace crates together.

pub mod bootstrap;
pub mod cli;
