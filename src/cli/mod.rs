//! Command-line interface support
//!
//! Argument handling, logging setup and command implementations for the
//! `cdi-metadata-cli` binary.

pub mod commands;
pub mod error;
pub mod logging;
