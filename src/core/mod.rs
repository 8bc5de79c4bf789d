//! core
//!
//! Domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, BranchScope, Commit
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod types;
