//! Publish AL apps to Business Central as per-tenant extensions
//!
//! The library holds the whole pipeline (project files, the Business Central
//! automation API calls and the orchestration); the binary only wires it to
//! a terminal.

pub mod api;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod project;
pub mod ui;
