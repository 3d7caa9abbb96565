//! Command-line front end for the renewable-energy pipeline.
//!
//! The binary wires five stages together: convert raw climate matrices,
//! aggregate per-city features, merge the master dataset, train and
//! recursively forecast, and render the objective dashboard. All heavy
//! lifting lives in the library crates; this crate is argument parsing,
//! config resolution, and text output.

pub mod cli;
pub mod dashboard;
