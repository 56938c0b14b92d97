//! mtnav CLI
//!
//! Command-line front end over the application layer: destination listing,
//! navigation, external method dispatch and configuration management.

pub mod commands;
pub mod output;
