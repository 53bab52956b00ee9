//! DataBridge operations tooling.
//!
//! Starts and supervises the API and frontend processes, probes ports and
//! health endpoints, diagnoses PostgreSQL connectivity, and writes the cloud
//! deployment descriptors.

pub mod cli;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod frontend;
pub mod launcher;
pub mod probe;
pub mod status;
