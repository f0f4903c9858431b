//! Mitten CLI - Command-line interface for the Michigan attractions harvester
//!
//! This crate provides the CLI application that ties together all Mitten components.

pub mod config;

pub use config::{Command, Config};
