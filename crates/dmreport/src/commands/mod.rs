//! Command implementations for the dmreport CLI
//!
//! Each command module handles the CLI interface and delegates to the
//! library crates for the actual work.

pub mod diff;
