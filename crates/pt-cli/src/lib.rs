//! Presence tracker CLI library.
//!
//! This crate provides the `pt` command-line interface around the
//! resolution engine and the SQLite store.

pub mod apply;
mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
